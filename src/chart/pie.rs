/// Label of the bucket holding everything that did not make it to the top.
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq)]
/// A slice of a pie chart.
pub struct PieBucket {
    pub label: String,
    pub value: f64,
}

impl PieBucket {
    pub fn new(label: &str, value: f64) -> PieBucket {
        PieBucket {
            label: label.to_string(),
            value,
        }
    }

    pub fn is_other(&self) -> bool {
        self.label == OTHER_LABEL
    }
}

/// Keeps the `cutoff` biggest values as buckets of their own and merges the
/// remaining ones in a trailing "Other" bucket.
///
/// Buckets are sorted by value, biggest first (ties keep input order).  When
/// there are no more than `cutoff` values nothing gets merged.  Labels without
/// a value (or values without a label) are ignored, and so are values that
/// are not finite.
pub fn aggregate(labels: &[String], values: &[f64], cutoff: usize) -> Vec<PieBucket> {
    let mut buckets: Vec<PieBucket> = labels
        .iter()
        .zip(values.iter())
        .filter(|(label, value)| {
            if !value.is_finite() {
                debug!("Ignoring value {} of '{}'", value, label);
            }
            value.is_finite()
        })
        .map(|(label, value)| PieBucket::new(label, *value))
        .collect();
    buckets.sort_by(|a, b| b.value.total_cmp(&a.value));
    if buckets.len() > cutoff {
        let rest: f64 = buckets.drain(cutoff..).map(|bucket| bucket.value).sum();
        buckets.push(PieBucket::new(OTHER_LABEL, rest));
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use rand::Rng;

    fn strings(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merges_long_tail() {
        let buckets = aggregate(&strings(&["A", "B", "C", "D"]), &[50.0, 30.0, 15.0, 5.0], 2);
        assert_eq!(
            buckets,
            vec![
                PieBucket::new("A", 50.0),
                PieBucket::new("B", 30.0),
                PieBucket::new("Other", 20.0),
            ]
        );
        assert!(buckets[2].is_other());
    }

    #[test]
    fn sorts_before_cutting() {
        let buckets = aggregate(
            &strings(&["small", "huge", "medium", "tiny"]),
            &[10.0, 1000.0, 100.0, 1.0],
            2,
        );
        assert_eq!(buckets[0].label, "huge");
        assert_eq!(buckets[1].label, "medium");
        assert_eq!(buckets[2].label, "Other");
        assert_float_eq!(buckets[2].value, 11.0, rmax <= f64::EPSILON);
    }

    #[test]
    fn no_merge_below_cutoff() {
        let buckets = aggregate(&strings(&["A", "B"]), &[1.0, 2.0], 2);
        assert_eq!(buckets.len(), 2);
        assert!(buckets.iter().all(|b| !b.is_other()));
        assert!(aggregate(&[], &[], 20).is_empty());
    }

    #[test]
    fn skips_values_that_are_not_finite() {
        let buckets = aggregate(
            &strings(&["A", "nan", "B", "inf", "C"]),
            &[5.0, f64::NAN, 7.0, f64::INFINITY, 1.0],
            1,
        );
        assert_eq!(
            buckets,
            vec![PieBucket::new("B", 7.0), PieBucket::new("Other", 6.0)]
        );
    }

    #[test]
    fn zero_cutoff_merges_everything() {
        let buckets = aggregate(&strings(&["A", "B"]), &[1.0, 2.0], 0);
        assert_eq!(buckets, vec![PieBucket::new("Other", 3.0)]);
    }

    #[test]
    fn bucket_count_on_random_input() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let m = rng.gen_range(0..60);
            let cutoff = rng.gen_range(1..30);
            let labels: Vec<String> = (0..m).map(|i| format!("t{}", i)).collect();
            let values: Vec<f64> = (0..m).map(|_| rng.gen_range(0.0..1e9)).collect();
            let buckets = aggregate(&labels, &values, cutoff);
            if m > cutoff {
                assert_eq!(buckets.len(), cutoff + 1);
                assert!(buckets[cutoff].is_other());
                let mut sorted = values.clone();
                sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
                let excluded: f64 = sorted[cutoff..].iter().sum();
                assert_float_eq!(buckets[cutoff].value, excluded, rmax <= 1e-9);
            } else {
                assert_eq!(buckets.len(), m);
            }
        }
    }
}
