use super::model::{LaunchDataset, LaunchRecord, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Payload/outcome filter (scatter chart input)
// ---------------------------------------------------------------------------

/// Return the records plotted on the payload scatter chart, in dataset order.
///
/// A record passes when:
/// * its payload mass is known and lies in `range` (inclusive), and
/// * the selection is [`SiteSelection::All`] or names the record's site.
///
/// Records with a missing payload never pass, whatever the range.
pub fn filter_by_payload<'a>(
    dataset: &'a LaunchDataset,
    selection: &SiteSelection,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    dataset
        .records
        .iter()
        .filter(|r| r.payload_mass_kg.is_some_and(|m| range.contains(m)))
        .filter(|r| selection.matches(&r.site))
        .collect()
}
