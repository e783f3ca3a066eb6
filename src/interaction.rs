//! Click-to-inspect state for the summary bar chart
//!
//! [`InteractionState`] is a two-state machine: `Empty`, or holding the last
//! clicked bar as a [`ClickSelection`] snapshot. Transitions are pure
//! functions of the current state, an [`InteractionEvent`] and the chart the
//! click was made on, so the state can be driven without any UI.

use crate::analysis::ChartData;

/// A concrete bar: series index and category (label) index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartElement {
    pub dataset_index: usize,
    pub index: usize,
}

impl ChartElement {
    pub fn new(dataset_index: usize, index: usize) -> Self {
        Self {
            dataset_index,
            index,
        }
    }
}

/// Snapshot of a clicked bar, taken at click time
#[derive(Debug, Clone, PartialEq)]
pub struct ClickSelection {
    /// Category axis label (the parameter name)
    pub label: String,
    /// Series label (the statistic)
    pub dataset_label: String,
    pub value: f64,
}

impl ClickSelection {
    /// Callout text shown under the chart
    pub fn describe(&self) -> String {
        format!("{} for {} = {}", self.dataset_label, self.label, self.value)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// A click on the chart; `None` when it hit empty plot area
    Click(Option<ChartElement>),
    /// The active dataset changed or its summary was re-fetched
    DatasetChanged,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Empty,
    HasSelection(ClickSelection),
}

impl InteractionState {
    /// Next state for `event` on `chart`.
    ///
    /// Clicks that do not resolve to a drawn bar leave the state unchanged.
    pub fn transition(self, event: InteractionEvent, chart: &ChartData) -> Self {
        match event {
            InteractionEvent::DatasetChanged => InteractionState::Empty,
            InteractionEvent::Click(element) => {
                match element.and_then(|e| resolve_click(e, chart)) {
                    Some(selection) => InteractionState::HasSelection(selection),
                    None => self,
                }
            }
        }
    }

    /// Apply a click in place
    pub fn click(&mut self, element: Option<ChartElement>, chart: &ChartData) {
        let current = std::mem::take(self);
        *self = current.transition(InteractionEvent::Click(element), chart);
    }

    /// Drop any held selection
    pub fn reset(&mut self) {
        *self = InteractionState::Empty;
    }

    pub fn selection(&self) -> Option<&ClickSelection> {
        match self {
            InteractionState::Empty => None,
            InteractionState::HasSelection(selection) => Some(selection),
        }
    }
}

/// Resolve a chart element to a selection snapshot.
///
/// Out-of-range indices and absent slots (no bar is drawn there) resolve to
/// `None`.
pub fn resolve_click(element: ChartElement, chart: &ChartData) -> Option<ClickSelection> {
    let label = chart.labels.get(element.index)?;
    let series = chart.series.get(element.dataset_index)?;
    let value = series.values.get(element.index)?.value()?;
    Some(ClickSelection {
        label: label.clone(),
        dataset_label: series.label.clone(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derive_summary_series;
    use crate::types::{StatKind, Summary};
    use serde_json::json;

    fn chart() -> ChartData {
        let summary: Summary = serde_json::from_value(json!({
            "A": {"mean": 1},
            "B": {"mean": 2, "median": 5},
            "C": {"mean": 3, "median": 7},
        }))
        .unwrap();
        derive_summary_series(&summary, &[StatKind::Mean, StatKind::Median])
    }

    #[test]
    fn test_click_resolves_snapshot() {
        let state = InteractionState::default()
            .transition(InteractionEvent::Click(Some(ChartElement::new(1, 2))), &chart());
        assert_eq!(
            state.selection(),
            Some(&ClickSelection {
                label: "C".to_string(),
                dataset_label: "median".to_string(),
                value: 7.0,
            })
        );
    }

    #[test]
    fn test_last_click_wins() {
        let chart = chart();
        let mut state = InteractionState::default();
        state.click(Some(ChartElement::new(0, 0)), &chart);
        state.click(Some(ChartElement::new(0, 1)), &chart);
        assert_eq!(state.selection().map(|s| s.label.as_str()), Some("B"));
        assert_eq!(state.selection().map(|s| s.value), Some(2.0));
    }

    #[test]
    fn test_unresolvable_clicks_are_noops() {
        let chart = chart();
        let mut state = InteractionState::default();
        state.click(None, &chart);
        assert_eq!(state, InteractionState::Empty);

        state.click(Some(ChartElement::new(0, 2)), &chart);
        let held = state.clone();

        // empty area, out of range, and the absent median of "A"
        state.click(None, &chart);
        state.click(Some(ChartElement::new(5, 0)), &chart);
        state.click(Some(ChartElement::new(0, 9)), &chart);
        state.click(Some(ChartElement::new(1, 0)), &chart);
        assert_eq!(state, held);
    }

    #[test]
    fn test_dataset_change_clears() {
        let chart = chart();
        let state = InteractionState::default()
            .transition(InteractionEvent::Click(Some(ChartElement::new(0, 0))), &chart)
            .transition(InteractionEvent::DatasetChanged, &chart);
        assert_eq!(state, InteractionState::Empty);
    }

    #[test]
    fn test_selection_is_a_snapshot() {
        let mut chart = chart();
        let mut state = InteractionState::default();
        state.click(Some(ChartElement::new(1, 2)), &chart);

        chart.series[1].label = "changed".to_string();
        chart.labels.clear();
        assert_eq!(state.selection().map(|s| s.dataset_label.as_str()), Some("median"));
    }

    #[test]
    fn test_describe() {
        let selection = ClickSelection {
            label: "temperature".to_string(),
            dataset_label: "max".to_string(),
            value: 22.5,
        };
        assert_eq!(selection.describe(), "max for temperature = 22.5");
    }
}
