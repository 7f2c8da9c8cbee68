//! Combining arrays gathered from multiple documents.
//!
//! Each source is typically "the array at the hierarchy root of one
//! document". The merge engine filters out unusable sources, then either
//! flattens everything into one array or preserves the per-source grouping.

use serde_json::Value;

/// How surviving source arrays are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Concatenate all sources into one flat array, in source order.
    #[default]
    Flatten,

    /// Keep each source as its own sub-array, in source order.
    Preserve,
}

impl MergeStrategy {
    /// Parse a strategy selector as it appears in `x-merge-arrays`.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "flatten" => Some(MergeStrategy::Flatten),
            "preserve" => Some(MergeStrategy::Preserve),
            _ => None,
        }
    }
}

/// Merge configuration: a strategy plus two orthogonal flags.
///
/// Every combination of strategy and flags is valid. `preserve_order` is
/// accepted for configuration compatibility but has no distinguishable
/// effect: output order is always source order. `filter_empty` additionally
/// drops sources that are empty arrays (non-arrays are always dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeConfig {
    pub strategy: MergeStrategy,
    pub preserve_order: bool,
    pub filter_empty: bool,
}

impl MergeConfig {
    pub fn flatten() -> Self {
        MergeConfig {
            strategy: MergeStrategy::Flatten,
            ..Default::default()
        }
    }

    pub fn preserve() -> Self {
        MergeConfig {
            strategy: MergeStrategy::Preserve,
            ..Default::default()
        }
    }

    pub fn with_filter_empty(mut self, filter_empty: bool) -> Self {
        self.filter_empty = filter_empty;
        self
    }
}

/// Merged data, shaped by the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum MergedData {
    /// `Flatten` output: one flat array.
    Flat(Vec<Value>),

    /// `Preserve` output: one independent copy per surviving source.
    Preserved(Vec<Vec<Value>>),
}

/// The outcome of a merge, with bookkeeping for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub data: MergedData,
    /// Number of sources that survived filtering.
    pub source_count: usize,
    /// Total number of elements across the merged output.
    pub item_count: usize,
    pub strategy: MergeStrategy,
}

/// Merge source arrays according to `config`.
pub fn merge(sources: &[Value], config: &MergeConfig) -> MergeResult {
    let surviving: Vec<&Vec<Value>> = sources
        .iter()
        .filter_map(Value::as_array)
        .filter(|items| !config.filter_empty || !items.is_empty())
        .collect();

    let source_count = surviving.len();
    match config.strategy {
        MergeStrategy::Flatten => {
            let data: Vec<Value> = surviving.into_iter().flatten().cloned().collect();
            let item_count = data.len();
            MergeResult {
                data: MergedData::Flat(data),
                source_count,
                item_count,
                strategy: MergeStrategy::Flatten,
            }
        }
        MergeStrategy::Preserve => {
            let data: Vec<Vec<Value>> = surviving.into_iter().cloned().collect();
            let item_count = data.iter().map(Vec::len).sum();
            MergeResult {
                data: MergedData::Preserved(data),
                source_count,
                item_count,
                strategy: MergeStrategy::Preserve,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sources() -> Vec<Value> {
        vec![json!(["a", "b"]), json!(["c"]), json!(["d", "e", "f"])]
    }

    #[test]
    fn flatten_concatenates_in_source_order() {
        let result = merge(&sources(), &MergeConfig::flatten());
        assert_eq!(
            result.data,
            MergedData::Flat(vec![
                json!("a"),
                json!("b"),
                json!("c"),
                json!("d"),
                json!("e"),
                json!("f")
            ])
        );
        assert_eq!(result.source_count, 3);
        assert_eq!(result.item_count, 6);
        assert_eq!(result.strategy, MergeStrategy::Flatten);
    }

    #[test]
    fn flatten_item_count_is_sum_of_surviving_lengths() {
        let inputs = vec![json!([1, 2]), json!("not an array"), json!([3])];
        let result = merge(&inputs, &MergeConfig::flatten());
        assert_eq!(result.source_count, 2);
        assert_eq!(result.item_count, 3);
    }

    #[test]
    fn preserve_keeps_one_sub_array_per_surviving_source() {
        let result = merge(&sources(), &MergeConfig::preserve());
        assert_eq!(
            result.data,
            MergedData::Preserved(vec![
                vec![json!("a"), json!("b")],
                vec![json!("c")],
                vec![json!("d"), json!("e"), json!("f")],
            ])
        );
        assert_eq!(result.source_count, 3);
        assert_eq!(result.item_count, 6);
    }

    #[test]
    fn non_arrays_are_always_dropped() {
        let inputs = vec![json!({"k": 1}), json!([1]), json!(null), json!(2)];
        let result = merge(&inputs, &MergeConfig::flatten());
        assert_eq!(result.data, MergedData::Flat(vec![json!(1)]));
        assert_eq!(result.source_count, 1);
    }

    #[test]
    fn filter_empty_drops_empty_sources() {
        let inputs = vec![json!([]), json!([1]), json!([])];

        let kept = merge(&inputs, &MergeConfig::preserve());
        assert_eq!(kept.source_count, 3);
        assert_eq!(kept.item_count, 1);

        let filtered = merge(&inputs, &MergeConfig::preserve().with_filter_empty(true));
        assert_eq!(filtered.source_count, 1);
        assert_eq!(filtered.data, MergedData::Preserved(vec![vec![json!(1)]]));
    }

    #[test]
    fn preserve_order_flag_is_a_no_op() {
        // The flag is accepted for config compatibility; output order is
        // always source order, so both settings produce identical results.
        let ordered = MergeConfig {
            preserve_order: true,
            ..MergeConfig::flatten()
        };
        let unordered = MergeConfig {
            preserve_order: false,
            ..MergeConfig::flatten()
        };
        assert_eq!(merge(&sources(), &ordered), merge(&sources(), &unordered));
    }

    #[test]
    fn preserve_output_does_not_alias_sources() {
        let inputs = vec![json!([{"k": 1}])];
        let result = merge(&inputs, &MergeConfig::preserve());
        let MergedData::Preserved(mut groups) = result.data else {
            panic!("expected preserved data");
        };
        groups[0][0] = json!({"k": 2});
        assert_eq!(inputs[0], json!([{"k": 1}]));
    }

    #[test]
    fn merging_no_sources_is_total() {
        let result = merge(&[], &MergeConfig::flatten());
        assert_eq!(result.data, MergedData::Flat(vec![]));
        assert_eq!(result.source_count, 0);
        assert_eq!(result.item_count, 0);
    }

    #[test]
    fn strategy_selector_parsing() {
        assert_eq!(
            MergeStrategy::from_selector("flatten"),
            Some(MergeStrategy::Flatten)
        );
        assert_eq!(
            MergeStrategy::from_selector("preserve"),
            Some(MergeStrategy::Preserve)
        );
        assert_eq!(MergeStrategy::from_selector("other"), None);
    }
}
