use async_trait::async_trait;
use ofactest_client::{OfacClient, SearchOptions, SearchResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Check;
use crate::context::CheckContext;
use crate::error::{CheckError, SemanticError};

const OPERATION: &str = "search";

/// One known query and what the service must return for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCase {
    /// Name sent to `/search`.
    pub query: String,
    /// Required outcome.
    pub expect: Expectation,
}

/// Expected outcome of a [`SearchCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// The entity must be returned with at least `min_score`.
    Entity {
        /// OFAC entity number.
        id: String,
        /// Lowest acceptable similarity score.
        min_score: f64,
    },
    /// No candidate may score above `max_score`.
    NoMatchAbove {
        /// Score no candidate may exceed.
        max_score: f64,
    },
}

impl SearchCase {
    /// Case expecting `id` to match `query` with at least `min_score`.
    #[must_use]
    pub fn entity(query: impl Into<String>, id: impl Into<String>, min_score: f64) -> Self {
        Self {
            query: query.into(),
            expect: Expectation::Entity {
                id: id.into(),
                min_score,
            },
        }
    }

    /// Case expecting no candidate to exceed `max_score`.
    #[must_use]
    pub fn no_match(query: impl Into<String>, max_score: f64) -> Self {
        Self {
            query: query.into(),
            expect: Expectation::NoMatchAbove { max_score },
        }
    }
}

/// Built-in fixtures: well known SDN entries plus a name that must not match.
#[must_use]
pub fn default_cases() -> Vec<SearchCase> {
    vec![
        SearchCase::entity("Nicolas Maduro Moros", "22790", 0.90),
        SearchCase::entity("Banco Nacional de Cuba", "306", 0.90),
        SearchCase::no_match("Quillon Vexbridge Marmaduke", 0.90),
    ]
}

/// Check one response against its case.
///
/// # Errors
///
/// Returns the [`SemanticError`] describing the first violated expectation.
pub fn evaluate(case: &SearchCase, response: &SearchResponse) -> Result<(), SemanticError> {
    match &case.expect {
        Expectation::Entity { id, min_score } => {
            let best = response
                .candidates()
                .filter(|(entity_id, _)| *entity_id == id.as_str())
                .map(|(_, score)| score)
                .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));

            match best {
                None => Err(SemanticError::MismatchedIdentifier {
                    query: case.query.clone(),
                    expected: id.clone(),
                    top: response
                        .top_candidate()
                        .map(|(entity_id, score)| (entity_id.to_string(), score)),
                }),
                Some(score) if score < *min_score => Err(SemanticError::ScoreBelowThreshold {
                    query: case.query.clone(),
                    entity_id: id.clone(),
                    score,
                    min_score: *min_score,
                }),
                Some(_) => Ok(()),
            }
        }
        Expectation::NoMatchAbove { max_score } => match response.top_candidate() {
            Some((entity_id, score)) if score > *max_score => Err(SemanticError::UnexpectedMatch {
                query: case.query.clone(),
                entity_id: entity_id.to_string(),
                score,
                max_score: *max_score,
            }),
            _ => Ok(()),
        },
    }
}

/// Runs every [`SearchCase`] in order, stopping at the first violation.
#[derive(Debug, Clone)]
pub struct SearchCheck {
    cases: Vec<SearchCase>,
    limit: u32,
}

impl SearchCheck {
    /// Create a check over `cases`, asking for at most `limit` results per query.
    #[must_use]
    pub fn new(cases: Vec<SearchCase>, limit: u32) -> Self {
        Self { cases, limit }
    }

    /// Cases this check will run.
    #[must_use]
    pub fn cases(&self) -> &[SearchCase] {
        &self.cases
    }
}

impl Default for SearchCheck {
    fn default() -> Self {
        Self::new(default_cases(), 5)
    }
}

#[async_trait]
impl Check for SearchCheck {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn run(&self, client: &OfacClient, ctx: &CheckContext) -> Result<String, CheckError> {
        for case in &self.cases {
            let options = SearchOptions::new(case.query.as_str(), self.limit);
            let response = ctx
                .run(OPERATION, client.search(&options))
                .await?
                .map_err(|e| CheckError::from_client(OPERATION, e))?;

            evaluate(case, &response)?;
            debug!(query = %case.query, top = ?response.top_candidate(), "search case passed");
        }

        Ok(format!("search queries passed ({} cases)", self.cases.len()))
    }
}
