use chrono::Local;

use crate::query_hydrator::QueryHydrator;
use crate::types::RepricingRun;

/// Fills in the run date from the local clock when the caller left it
/// empty. A given date is kept, which makes runs reproducible.
pub struct RunDateQueryHydrator;

impl QueryHydrator<RepricingRun> for RunDateQueryHydrator {
    fn enable(&self, query: &RepricingRun) -> bool {
        query.today.is_none()
    }

    fn hydrate(&self, query: &RepricingRun) -> Result<RepricingRun, String> {
        Ok(RepricingRun {
            today: Some(Local::now().date_naive()),
            ..query.clone()
        })
    }

    fn update(&self, query: &mut RepricingRun, hydrated: RepricingRun) {
        query.today = hydrated.today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn explicit_date_disables_hydration() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(!RunDateQueryHydrator.enable(&RepricingRun::on("run", today)));
        assert!(RunDateQueryHydrator.enable(&RepricingRun::new("run")));
    }

    #[test]
    fn hydrates_missing_date() {
        let mut query = RepricingRun::new("run");
        let hydrated = RunDateQueryHydrator.hydrate(&query).unwrap();
        RunDateQueryHydrator.update(&mut query, hydrated);
        assert!(query.today.is_some());
        assert_eq!(query.run_id, "run");
    }
}
