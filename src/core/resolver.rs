use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::core::automation::{AutomationClient, JobTemplatePage};
use crate::errors::{BridgeError, BridgeResult};

/// What a name lookup against the controller turned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLookup {
    Found(u64),
    NotFound,
    Ambiguous(u64),
}

impl TemplateLookup {
    pub fn from_page(page: &JobTemplatePage) -> BridgeResult<Self> {
        match page.count {
            0 => Ok(TemplateLookup::NotFound),
            1 => page
                .results
                .first()
                .map(|template| TemplateLookup::Found(template.id))
                .ok_or_else(|| {
                    BridgeError::lookup_failed("controller reported one match but returned no results")
                }),
            count => Ok(TemplateLookup::Ambiguous(count)),
        }
    }
}

/// Turns a human-readable template name into exactly one template id.
#[derive(Clone)]
pub struct TemplateResolver {
    client: Arc<dyn AutomationClient>,
}

impl TemplateResolver {
    pub fn new(client: Arc<dyn AutomationClient>) -> Self {
        Self { client }
    }

    pub async fn lookup(&self, credentials: &Credentials, name: &str) -> BridgeResult<TemplateLookup> {
        let page = self.client.list_job_templates(credentials, name).await?;
        let lookup = TemplateLookup::from_page(&page)?;
        debug!(template = name, ?lookup, "Job template lookup finished");
        Ok(lookup)
    }

    pub async fn resolve(&self, credentials: &Credentials, name: &str) -> BridgeResult<u64> {
        match self.lookup(credentials, name).await? {
            TemplateLookup::Found(id) => {
                info!(template = name, template_id = id, "Resolved job template");
                Ok(id)
            }
            TemplateLookup::NotFound => Err(BridgeError::TemplateNotFound { name: name.to_string() }),
            TemplateLookup::Ambiguous(count) => Err(BridgeError::AmbiguousTemplate {
                name: name.to_string(),
                count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automation::JobTemplateSummary;

    fn page(count: u64, ids: &[u64]) -> JobTemplatePage {
        JobTemplatePage {
            count,
            results: ids
                .iter()
                .map(|id| JobTemplateSummary { id: *id })
                .collect(),
        }
    }

    #[test]
    fn test_classify_pages() {
        assert_eq!(TemplateLookup::from_page(&page(0, &[])).unwrap(), TemplateLookup::NotFound);
        assert_eq!(TemplateLookup::from_page(&page(1, &[42])).unwrap(), TemplateLookup::Found(42));
        assert_eq!(
            TemplateLookup::from_page(&page(2, &[7, 8])).unwrap(),
            TemplateLookup::Ambiguous(2)
        );
    }

    #[test]
    fn test_count_wins_over_truncated_results() {
        // the controller paginates, so results may be shorter than count
        assert_eq!(
            TemplateLookup::from_page(&page(30, &[1])).unwrap(),
            TemplateLookup::Ambiguous(30)
        );
    }

    #[test]
    fn test_single_match_without_results_is_an_error() {
        let err = TemplateLookup::from_page(&page(1, &[])).unwrap_err();
        assert!(matches!(err, BridgeError::ServiceUnavailable { .. }));
    }
}
