use std::sync::Arc;

use crate::util;

/// What a finished run hands to its side effects.
pub struct SideEffectInput<Q, C> {
    pub query: Arc<Q>,
    pub selected_candidates: Vec<C>,
    pub filtered_candidates: Vec<C>,
}

/// Runs after selection. A side effect can report on a run but never
/// change its result; failures are logged and ignored.
pub trait SideEffect<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    fn run(&self, input: &SideEffectInput<Q, C>) -> Result<(), String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
