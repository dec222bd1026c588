mod config;
pub mod builder;
pub mod manual;

use log::debug;

pub use crate::config::*;

/// Moves `tag` to one end of the order.
///
/// The tag is removed from its current position, then inserted first
/// ([`Placement::Front`]) or appended last ([`Placement::Back`]). All the
/// other labels keep their relative order.
pub fn reorder(
    mut order: Vec<String>,
    tag: &str,
    placement: Placement,
) -> Result<Vec<String>, OrderError> {
    let idx = order
        .iter()
        .position(|label| label == tag)
        .ok_or_else(|| OrderError::MissingLabel(tag.to_string()))?;
    let label = order.remove(idx);
    match placement {
        Placement::Front => order.insert(0, label),
        Placement::Back => order.push(label),
    }
    Ok(order)
}

/// Applies one rule to an order.
///
/// The candidates are the labels of `counts`, visited by descending count.
/// Every label that matches the pattern is relocated in turn, so among
/// several matches the last visited one ends up closest to the pinned end.
///
/// Arguments:
/// * `counts` the value counts of the column
/// * `rule` the pattern and placement
/// * `order` the current order. If not provided, the labels of `counts` are used.
pub fn reorder_by(
    counts: &ValueCounts,
    rule: &ReorderRule,
    order: Option<Vec<String>>,
) -> Result<Vec<String>, OrderError> {
    let mut order = order.unwrap_or_else(|| counts.labels());
    for (label, _) in counts.iter() {
        if rule.matches(label) {
            debug!(
                "reorder_by: {:?} matches {:?}, moving to {:?}",
                label,
                rule.pattern.as_str(),
                rule.placement
            );
            order = reorder(order, label, rule.placement)?;
        }
    }
    Ok(order)
}

/// Computes the display order of the categories of a column.
///
/// The order starts by descending count, then each rule of the policy is
/// applied in sequence.
///
/// ```
/// use category_order::{get_order, OrderPolicy, ValueCounts};
///
/// let counts = ValueCounts::from_pairs(&[
///     ("Engineer", 10),
///     ("Manager", 5),
///     ("Other", 3),
///     ("No Record", 1),
/// ]);
/// let order = get_order(&counts, &OrderPolicy::default_policy())?;
/// assert_eq!(order, vec!["Engineer", "Manager", "Other", "No Record"]);
/// # Ok::<(), category_order::OrderError>(())
/// ```
pub fn get_order(counts: &ValueCounts, policy: &OrderPolicy) -> Result<Vec<String>, OrderError> {
    let mut order = counts.labels();
    for rule in policy.rules.iter() {
        order = reorder_by(counts, rule, Some(order))?;
    }
    debug!("get_order: {:?}", order);
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn attendee_counts() -> ValueCounts {
        ValueCounts::from_pairs(&[
            ("Engineer", 10),
            ("Manager", 5),
            ("Other", 3),
            ("No Record", 1),
        ])
    }

    fn end_rule(pattern: &str) -> ReorderRule {
        ReorderRule::new(pattern, Placement::Back).unwrap()
    }

    #[test]
    fn no_rules_sorted_by_count() {
        init();
        let counts = ValueCounts::from_pairs(&[("b", 2), ("a", 7), ("c", 4), ("d", 4)]);
        let order = get_order(&counts, &OrderPolicy::EMPTY).unwrap();
        assert_eq!(order, vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn empty_counts_give_empty_order() {
        init();
        let order = get_order(&ValueCounts::default(), &OrderPolicy::default_policy()).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn default_policy_attendees() {
        init();
        let counts = attendee_counts();

        let after_other = reorder_by(&counts, &end_rule(OTHER_PATTERN), None).unwrap();
        assert_eq!(after_other, vec!["Engineer", "Manager", "No Record", "Other"]);

        let after_no_record =
            reorder_by(&counts, &end_rule(NO_RECORD_PATTERN), Some(after_other)).unwrap();
        assert_eq!(
            after_no_record,
            vec!["Engineer", "Manager", "Other", "No Record"]
        );

        let order = get_order(&counts, &OrderPolicy::default_policy()).unwrap();
        assert_eq!(order, after_no_record);
    }

    #[test]
    fn pin_to_front() {
        init();
        let counts = ValueCounts::from_pairs(&[("A", 1), ("Other", 1)]);
        let policy =
            OrderPolicy::EMPTY.with_rule(ReorderRule::new("Other", Placement::Front).unwrap());
        assert_eq!(get_order(&counts, &policy).unwrap(), vec!["Other", "A"]);
    }

    #[test]
    fn pin_to_front_shifts_others() {
        init();
        let counts = ValueCounts::from_pairs(&[("x", 9), ("y", 8), ("z", 7)]);
        let order = reorder(counts.labels(), "z", Placement::Front).unwrap();
        assert_eq!(order, vec!["z", "x", "y"]);
    }

    #[test]
    fn matching_labels_after_non_matching() {
        init();
        let counts = ValueCounts::from_pairs(&[
            ("Others", 40),
            ("Student", 12),
            ("other industries", 30),
            ("Designer", 3),
            ("Engineer", 25),
        ]);
        let rule = end_rule(OTHER_PATTERN);
        let order = get_order(&counts, &OrderPolicy::EMPTY.with_rule(rule.clone())).unwrap();
        let first_match = order.iter().position(|l| rule.matches(l)).unwrap();
        assert!(order[..first_match].iter().all(|l| !rule.matches(l)));
        assert!(order[first_match..].iter().all(|l| rule.matches(l)));
        // Visited by descending count: the least frequent match is last.
        assert_eq!(
            order,
            vec!["Engineer", "Student", "Designer", "Others", "other industries"]
        );
    }

    #[test]
    fn last_rule_wins() {
        init();
        let counts = ValueCounts::from_pairs(&[
            ("Other (No Record)", 6),
            ("Sales", 5),
            ("Other", 2),
            ("No Record", 1),
        ]);
        let order = get_order(&counts, &OrderPolicy::default_policy()).unwrap();
        assert_eq!(order.last().unwrap(), "No Record");
        // Matches both patterns: placed by the "No Record" rule, after "Other".
        assert_eq!(order, vec!["Sales", "Other", "Other (No Record)", "No Record"]);
    }

    #[test]
    fn pin_to_end_is_idempotent() {
        init();
        let counts = ValueCounts::from_pairs(&[
            ("Other", 9),
            ("Marketing", 4),
            ("other", 2),
            ("Legal", 1),
        ]);
        let rule = end_rule(OTHER_PATTERN);
        let once = reorder_by(&counts, &rule, None).unwrap();
        let twice = reorder_by(&counts, &rule, Some(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn search_is_case_sensitive() {
        init();
        let counts = ValueCounts::from_pairs(&[("OTHER", 3), ("x", 1)]);
        let order = get_order(&counts, &OrderPolicy::default_policy()).unwrap();
        assert_eq!(order, vec!["OTHER", "x"]);
    }

    #[test]
    fn missing_label() {
        init();
        let counts = attendee_counts();
        let res = reorder_by(
            &counts,
            &end_rule("No Record"),
            Some(vec!["Engineer".to_string(), "Manager".to_string()]),
        );
        assert_eq!(res, Err(OrderError::MissingLabel("No Record".to_string())));
    }

    #[test]
    fn invalid_pattern() {
        init();
        let res = ReorderRule::new("Other(", Placement::Back);
        assert!(matches!(res, Err(OrderError::InvalidPattern { .. })));
    }

    #[test]
    fn from_pairs_merges_duplicates() {
        let counts = ValueCounts::from_pairs(&[("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(counts.labels(), vec!["a", "b"]);
        assert_eq!(counts.count("a"), Some(4));
        assert_eq!(counts.total(), 6);
    }
}
