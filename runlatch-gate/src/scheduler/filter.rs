//! Selection of the runs that still hold the queue

use runlatch_core::domain::Run;

/// Narrows the active runs of a workflow to the earlier ones we must wait for
///
/// Keeps runs that share our queue (when a queue name is set), started
/// before us (`id < current_run_id`) and have not succeeded. The result is
/// ordered by id, newest first, with duplicates removed; a run can show up in
/// more than one status listing while it changes state.
pub fn relevant_previous_runs(
    runs: Vec<Run>,
    current_run_id: u64,
    queue_name: Option<&str>,
) -> Vec<Run> {
    let mut previous: Vec<Run> = runs
        .into_iter()
        .filter(|run| queue_name.is_none_or(|name| run.matches_queue(name)))
        .filter(|run| run.id < current_run_id)
        .filter(|run| !run.succeeded())
        .collect();

    previous.sort_by(|a, b| b.id.cmp(&a.id));
    previous.dedup_by_key(|run| run.id);
    previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlatch_core::domain::{Conclusion, RunStatus};

    fn run(id: u64, conclusion: Option<Conclusion>, title: &str) -> Run {
        Run {
            id,
            status: Some(RunStatus::InProgress),
            conclusion,
            branch: Some("main".to_string()),
            display_title: Some(title.to_string()),
            name: Some("CI".to_string()),
            html_url: format!("https://github.com/o/r/actions/runs/{id}"),
        }
    }

    fn ids(runs: &[Run]) -> Vec<u64> {
        runs.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_only_earlier_runs_are_kept() {
        let runs = vec![run(9, None, "a"), run(10, None, "b"), run(11, None, "c")];
        assert_eq!(ids(&relevant_previous_runs(runs, 10, None)), vec![9]);
    }

    #[test]
    fn test_successful_runs_are_dropped_regardless_of_status() {
        let mut done = run(5, Some(Conclusion::Success), "a");
        done.status = Some(RunStatus::Completed);
        let mut lagging = run(6, Some(Conclusion::Success), "b");
        lagging.status = Some(RunStatus::InProgress);

        assert!(relevant_previous_runs(vec![done, lagging], 10, None).is_empty());
    }

    #[test]
    fn test_unsuccessful_conclusions_are_kept() {
        let runs = vec![
            run(1, Some(Conclusion::Failure), "a"),
            run(2, Some(Conclusion::Cancelled), "b"),
            run(3, None, "c"),
        ];
        assert_eq!(ids(&relevant_previous_runs(runs, 10, None)), vec![3, 2, 1]);
    }

    #[test]
    fn test_sorted_strictly_descending_without_duplicates() {
        let runs = vec![
            run(4, None, "a"),
            run(8, None, "b"),
            run(2, None, "c"),
            run(8, None, "b"),
            run(6, None, "d"),
        ];
        let result = relevant_previous_runs(runs, 100, None);
        assert_eq!(ids(&result), vec![8, 6, 4, 2]);
        assert!(result.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn test_queue_name_filters_by_title_or_name() {
        let mut named = run(3, None, "unrelated");
        named.name = Some("deploy-prod".to_string());
        let runs = vec![run(1, None, "deploy-prod: v1"), run(2, None, "docs"), named];

        let result = relevant_previous_runs(runs, 10, Some("deploy-prod"));
        assert_eq!(ids(&result), vec![3, 1]);
    }

    #[test]
    fn test_queue_name_is_case_sensitive() {
        let runs = vec![run(1, None, "Deploy")];
        assert!(relevant_previous_runs(runs, 10, Some("deploy")).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(relevant_previous_runs(Vec::new(), 10, None).is_empty());
    }
}
