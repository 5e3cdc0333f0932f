//! Domain vocabulary and relevance heuristic.

use std::collections::BTreeSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Common technical skills and domain-specific terms.
    static ref TECH_SKILLS: BTreeSet<&'static str> = BTreeSet::from([
        "python", "java", "javascript", "react", "node.js", "sql", "aws",
        "docker", "kubernetes", "machine learning", "deep learning", "ai",
        "data science", "backend", "frontend", "full stack", "devops",
        "cloud computing", "microservices", "rest api", "graphql",
        "continuous integration", "continuous deployment", "agile",
    ]);

    /// Common job titles and roles.
    static ref JOB_TITLES: BTreeSet<&'static str> = BTreeSet::from([
        "software engineer", "developer", "architect", "data scientist",
        "product manager", "project manager", "team lead", "director",
        "vp", "chief", "specialist", "analyst", "consultant",
        "administrator",
    ]);
}

/// Generic technical words worth a weak boost on containment.
const GENERIC_TECH_WORDS: [&str; 7] = ["data", "software", "system", "api", "web", "cloud", "app"];

/// A curated set of known domain terms, extensible per scorer instance.
#[derive(Debug, Clone)]
pub struct DomainVocabulary {
    terms: BTreeSet<String>,
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self::with_extra_terms(std::iter::empty::<String>())
    }
}

impl DomainVocabulary {
    /// Built-in skill and title sets plus caller-supplied extras.
    pub fn with_extra_terms<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: BTreeSet<String> = TECH_SKILLS
            .iter()
            .chain(JOB_TITLES.iter())
            .map(|t| t.to_string())
            .collect();
        terms.extend(extra.into_iter().map(|t| t.as_ref().to_lowercase()));
        Self { terms }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(&term.to_lowercase())
    }

    /// Heuristic boost in [0, 1]:
    /// 1.0 exact match, 0.75 substring overlap with a vocabulary entry in
    /// either direction, 0.5 containing a generic technical word, else 0.0.
    pub fn relevance(&self, term: &str) -> f64 {
        let term = term.to_lowercase();

        if self.terms.contains(&term) {
            return 1.0;
        }
        if self
            .terms
            .iter()
            .any(|known| term.contains(known.as_str()) || known.contains(&term))
        {
            return 0.75;
        }
        if GENERIC_TECH_WORDS.iter().any(|w| term.contains(w)) {
            return 0.5;
        }
        0.0
    }
}
