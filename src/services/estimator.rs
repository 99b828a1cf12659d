//! End-to-end estimation flow: prompt construction, model call,
//! normalization.

use tracing::debug;

use crate::domain::ProjectDetails;
use crate::error::ApiResult;
use crate::services::generator::TextGenerator;
use crate::services::normalize::normalize;
use crate::services::prompt::build_estimation_prompt;

/// Run one complete estimation: build the prompt for `project_description`,
/// await a single text response from the model, and normalize it into a
/// typed estimate. No retry, no internal concurrency guard.
pub async fn run_estimate(
    generator: &dyn TextGenerator,
    project_description: &str,
) -> ApiResult<ProjectDetails> {
    let prompt = build_estimation_prompt(project_description);
    let raw = generator.generate(&prompt).await?;
    debug!(response_len = raw.len(), "Model response received");
    normalize(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
            Err(ApiError::Upstream(anyhow::anyhow!("connection reset")))
        }
    }

    #[tokio::test]
    async fn successful_flow_yields_normalized_estimate() {
        let generator = FixedGenerator(
            r#"Sure: {"projectName":"Deck","length":5,"width":4,"height":1,"materials":[{"name":"Decking board","unit":"board","costPerUnit":12,"quantity":40}],"labor":[{"role":"Carpenter","costPerHour":45,"hours":16}]}"#
                .to_string(),
        );

        let details = run_estimate(&generator, "Build a 5x4m deck").await.unwrap();
        assert_eq!(details.project_name.as_deref(), Some("Deck"));
        assert_eq!(details.materials[0].name, "Decking board");
        assert_eq!(details.labor[0].role, "Carpenter");
    }

    #[tokio::test]
    async fn generator_failure_propagates() {
        let err = run_estimate(&FailingGenerator, "a shed").await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[tokio::test]
    async fn prose_only_response_is_an_extraction_error() {
        let generator = FixedGenerator("I cannot estimate that project.".to_string());
        let err = run_estimate(&generator, "a shed").await.unwrap_err();
        assert!(matches!(err, ApiError::Extraction(_)));
    }
}
