use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry an identifier that every log line is tagged with.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// One step of the ordered stage list. Filters, hydrators and scorers may
/// interleave freely; each step sees only the candidates the previous
/// filters kept.
pub enum Stage<Q, C>
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    Filter(Box<dyn Filter<Q, C>>),
    Hydrator(Box<dyn Hydrator<Q, C>>),
    Scorer(Box<dyn Scorer<Q, C>>),
}

impl<Q, C> Stage<Q, C>
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    pub fn name(&self) -> &str {
        match self {
            Stage::Filter(filter) => filter.name(),
            Stage::Hydrator(hydrator) => hydrator.name(),
            Stage::Scorer(scorer) => scorer.name(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Stage::Filter(_) => "Filter",
            Stage::Hydrator(_) => "Hydrator",
            Stage::Scorer(_) => "Scorer",
        }
    }
}

/// Everything a run produced.
pub struct PipelineResult<Q, C> {
    /// The query after query hydration.
    pub query: Arc<Q>,
    /// Candidates as fetched, before any stage ran.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by a filter, in removal order.
    pub filtered_candidates: Vec<C>,
    /// Survivors, as ordered by the selector.
    pub selected_candidates: Vec<C>,
}

/// A candidate pipeline: query hydration, sourcing, an ordered list of
/// stages, selection, then side effects.
///
/// Component errors never abort a run. They are logged with the request id
/// and the component name, and the run continues as if the component had
/// been disabled.
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn stages(&self) -> &[Stage<Q, C>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn side_effects(&self) -> &[Box<dyn SideEffect<Q, C>>];

    fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let hydrated_query = self.hydrate_query(query);
        let retrieved_candidates = self.fetch_candidates(&hydrated_query);
        let (kept, filtered_candidates) = self.run_stages(&hydrated_query, retrieved_candidates.clone());
        let selected_candidates = self.select(&hydrated_query, kept);

        let query = Arc::new(hydrated_query);
        let input = SideEffectInput {
            query,
            selected_candidates,
            filtered_candidates,
        };
        self.run_side_effects(&input);

        PipelineResult {
            query: input.query,
            retrieved_candidates,
            filtered_candidates: input.filtered_candidates,
            selected_candidates: input.selected_candidates,
        }
    }

    /// Run query hydrators in order; each sees the previous one's updates.
    fn hydrate_query(&self, query: Q) -> Q {
        let mut hydrated_query = query;
        for hydrator in self.query_hydrators().iter() {
            if !hydrator.enable(&hydrated_query) {
                continue;
            }
            match hydrator.hydrate(&hydrated_query) {
                Ok(hydrated) => hydrator.update(&mut hydrated_query, hydrated),
                Err(err) => log::error!(
                    "request_id={} stage=QueryHydrator component={} failed: {}",
                    hydrated_query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        hydrated_query
    }

    /// Concatenate every enabled source's candidates, in source order.
    fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let mut collected = Vec::new();
        for source in self.sources().iter().filter(|s| s.enable(query)) {
            match source.get_candidates(query) {
                Ok(mut candidates) => {
                    log::info!(
                        "request_id={} stage=Source component={} fetched {} candidates",
                        query.request_id(),
                        source.name(),
                        candidates.len()
                    );
                    collected.append(&mut candidates);
                }
                Err(err) => log::error!(
                    "request_id={} stage=Source component={} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        collected
    }

    /// Run the stage list. Returns `(kept, removed)`.
    fn run_stages(&self, query: &Q, candidates: Vec<C>) -> (Vec<C>, Vec<C>) {
        let mut current = candidates;
        let mut removed = Vec::new();

        for stage in self.stages() {
            let before = current.len();
            match stage {
                Stage::Filter(filter) => {
                    if !filter.enable(query) {
                        continue;
                    }
                    let backup = current.clone();
                    match filter.filter(query, current) {
                        Ok(result) => {
                            current = result.kept;
                            removed.extend(result.removed);
                        }
                        Err(err) => {
                            log::error!(
                                "request_id={} stage=Filter component={} failed: {}",
                                query.request_id(),
                                filter.name(),
                                err
                            );
                            current = backup;
                        }
                    }
                }
                Stage::Hydrator(hydrator) => {
                    if !hydrator.enable(query) {
                        continue;
                    }
                    let outcome = hydrator.hydrate(query, &current);
                    apply_updates(query, stage, &mut current, outcome, |c, h| hydrator.update(c, h));
                }
                Stage::Scorer(scorer) => {
                    if !scorer.enable(query) {
                        continue;
                    }
                    let outcome = scorer.score(query, &current);
                    apply_updates(query, stage, &mut current, outcome, |c, s| scorer.update(c, s));
                }
            }
            log::debug!(
                "request_id={} stage={} component={} kept {} removed {}",
                query.request_id(),
                stage.kind(),
                stage.name(),
                current.len(),
                before - current.len()
            );
        }

        (current, removed)
    }

    fn select(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let selector = self.selector();
        if selector.enable(query) {
            selector.select(query, candidates)
        } else {
            candidates
        }
    }

    fn run_side_effects(&self, input: &SideEffectInput<Q, C>) {
        for side_effect in self.side_effects() {
            if !side_effect.enable(&*input.query) {
                continue;
            }
            if let Err(err) = side_effect.run(input) {
                log::error!(
                    "request_id={} stage=SideEffect component={} failed: {}",
                    input.query.request_id(),
                    side_effect.name(),
                    err
                );
            }
        }
    }
}

/// Copy a hydrator's or scorer's output onto the candidates it was given.
/// A result of the wrong length is discarded whole.
fn apply_updates<Q, C, F>(
    query: &Q,
    stage: &Stage<Q, C>,
    candidates: &mut [C],
    outcome: Result<Vec<C>, String>,
    update: F,
) where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
    F: Fn(&mut C, C),
{
    match outcome {
        Ok(updated) if updated.len() == candidates.len() => {
            for (candidate, fields) in candidates.iter_mut().zip(updated) {
                update(candidate, fields);
            }
        }
        Ok(updated) => log::warn!(
            "request_id={} stage={} component={} skipped: expected {} results, got {}",
            query.request_id(),
            stage.kind(),
            stage.name(),
            candidates.len(),
            updated.len()
        ),
        Err(err) => log::error!(
            "request_id={} stage={} component={} failed: {}",
            query.request_id(),
            stage.kind(),
            stage.name(),
            err
        ),
    }
}
