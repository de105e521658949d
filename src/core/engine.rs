use crate::core::Pipeline;
use crate::utils::error::Result;

/// Runs a pipeline's extract, transform and load stages in order.
pub struct RuleEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RuleEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let name = self.pipeline.name();
        tracing::info!("Starting {} run", name);

        tracing::debug!("[{}] extracting", name);
        let extracted = self.pipeline.extract().await?;

        tracing::debug!("[{}] transforming", name);
        let transformed = self.pipeline.transform(extracted).await?;

        tracing::debug!("[{}] loading", name);
        let output_path = self.pipeline.load(transformed).await?;

        tracing::info!("{} run finished, output written to '{}'", name, output_path);
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RuleError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        stages: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        type Extracted = u32;
        type Transformed = u32;

        fn name(&self) -> &'static str {
            "recording"
        }

        async fn extract(&self) -> Result<u32> {
            self.stages.lock().unwrap().push("extract");
            Ok(1)
        }

        async fn transform(&self, data: u32) -> Result<u32> {
            self.stages.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(RuleError::ConfigError {
                    message: "boom".to_string(),
                });
            }
            Ok(data + 1)
        }

        async fn load(&self, result: u32) -> Result<String> {
            self.stages.lock().unwrap().push("load");
            Ok(format!("out-{}", result))
        }
    }

    #[test]
    fn test_engine_runs_stages_in_order() {
        let engine = RuleEngine::new(RecordingPipeline {
            stages: Mutex::new(Vec::new()),
            fail_transform: false,
        });

        let output = tokio_test::block_on(engine.run()).unwrap();

        assert_eq!(output, "out-2");
        assert_eq!(
            *engine.pipeline().stages.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[test]
    fn test_engine_stops_before_load_on_failure() {
        let engine = RuleEngine::new(RecordingPipeline {
            stages: Mutex::new(Vec::new()),
            fail_transform: true,
        });

        assert!(tokio_test::block_on(engine.run()).is_err());
        assert_eq!(
            *engine.pipeline().stages.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
