use std::collections::HashMap;

use log::info;

use super::error::PipelineError;
use super::execute::{LoadContext, execute};
use super::reference::ReferenceMap;
use super::report::RunSummary;
use super::stage::{MapKey, STANDARD_STAGES, StageDef, StageId};

/// An ordered list of stages whose dependencies have been checked
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<StageDef>,
}

impl Pipeline {
    /// Every required map must be produced by an earlier stage, and no map
    /// may be produced twice.
    pub fn new(stages: Vec<StageDef>) -> Result<Self, PipelineError> {
        let mut producers: HashMap<MapKey, StageId> = HashMap::new();

        for stage in &stages {
            if let Some(missing) = stage.requires.iter().find(|key| !producers.contains_key(key)) {
                return Err(PipelineError::InvalidOrder {
                    stage: stage.id,
                    map: *missing,
                });
            }
            if let Some(key) = stage.produces {
                if let Some(first) = producers.insert(key, stage.id) {
                    return Err(PipelineError::DuplicateProducer {
                        map: key,
                        first,
                        second: stage.id,
                    });
                }
            }
        }

        Ok(Self { stages })
    }

    /// All fifteen stages in creation order
    pub fn standard() -> Self {
        Self {
            stages: STANDARD_STAGES.to_vec(),
        }
    }

    pub fn stages(&self) -> &[StageDef] {
        &self.stages
    }

    /// Run every stage in order, stopping at the first failure.
    ///
    /// A failed stage is reported to the operator before the error is
    /// returned; stages after it never run.
    pub async fn run(&self, ctx: &mut LoadContext<'_>) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::new();
        let mut maps: HashMap<MapKey, ReferenceMap> = HashMap::new();
        info!("Starting run {} with {} stages", summary.run_id, self.stages.len());

        for def in &self.stages {
            info!("Stage {} ({})", def.label(), def.sobject);
            let output = match execute(def, ctx, &maps).await {
                Ok(output) => output,
                Err(source) => {
                    ctx.reporter.failure(&source.summary(def.label()), &source);
                    return Err(PipelineError::Stage { stage: def.id, source });
                }
            };

            ctx.reporter.stage_finished(&output.report);
            if let (Some(key), Some(map)) = (def.produces, output.produced) {
                maps.insert(key, map);
            }
            summary.stages.push(output.report);
        }

        info!(
            "Run {} finished: {} created, {} failed",
            summary.run_id,
            summary.total_created(),
            summary.total_failed()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_stages_validate() {
        let pipeline = Pipeline::new(STANDARD_STAGES.to_vec()).unwrap();
        assert_eq!(pipeline.stages().len(), 15);
        assert_eq!(Pipeline::standard().stages(), pipeline.stages());
    }

    #[test]
    fn test_stage_before_its_inputs_is_rejected() {
        let mut stages = STANDARD_STAGES.to_vec();
        // Cases ahead of Producers
        let cases = stages.remove(9);
        stages.insert(5, cases);

        match Pipeline::new(stages) {
            Err(PipelineError::InvalidOrder { stage, map }) => {
                assert_eq!(stage, StageId::Cases);
                assert_eq!(map, MapKey::Producers);
            }
            other => panic!("expected InvalidOrder, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_producer_is_rejected() {
        let mut stages = STANDARD_STAGES.to_vec();
        stages.push(STANDARD_STAGES[4].clone());

        assert!(matches!(
            Pipeline::new(stages),
            Err(PipelineError::DuplicateProducer {
                map: MapKey::Contacts,
                first: StageId::Contacts,
                second: StageId::Contacts,
            })
        ));
    }
}
