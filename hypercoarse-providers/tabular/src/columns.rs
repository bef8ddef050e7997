//! Header inspection for edge tables.

use csv::StringRecord;

use crate::errors::TabularError;

const ENDPOINT_PAIRS: [(&str, &str); 5] = [
    ("src", "trg"),
    ("source", "target"),
    ("node1", "node2"),
    ("u", "v"),
    ("from", "to"),
];
const CAPACITY_COLUMN: &str = "capacity";
const DISABLED_COLUMN: &str = "disabled";
const BASE_FEE_COLUMNS: [&str; 2] = ["fee_base_msat", "base_fee"];

/// Positions of the columns an edge table is read from.
///
/// # Examples
/// ```
/// use csv::StringRecord;
/// use hypercoarse_providers_tabular::ColumnLayout;
///
/// let headers = StringRecord::from(vec!["snapshot_id", "node1", "node2", "capacity"]);
/// let layout = ColumnLayout::detect(&headers).expect("endpoints found");
/// assert_eq!((layout.left, layout.right), (1, 2));
/// assert_eq!(layout.capacity, Some(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    /// First endpoint column.
    pub left: usize,
    /// Second endpoint column.
    pub right: usize,
    /// Optional edge capacity column.
    pub capacity: Option<usize>,
    /// Optional `disabled` flag column.
    pub disabled: Option<usize>,
    /// Optional base-fee column, `fee_base_msat` preferred over `base_fee`.
    pub base_fee: Option<usize>,
}

impl ColumnLayout {
    /// Detects the layout from a header row.
    ///
    /// Named endpoint pairs are tried in a fixed order; without a match the
    /// second and third columns are used, since the first commonly holds a
    /// snapshot identifier.
    ///
    /// # Errors
    /// Returns [`TabularError::MissingEndpointColumns`] when no named pair
    /// matches and the header has fewer than three columns.
    pub fn detect(headers: &StringRecord) -> Result<Self, TabularError> {
        let position = |name: &str| headers.iter().position(|header| header.trim() == name);
        let named = ENDPOINT_PAIRS
            .iter()
            .find_map(|&(left, right)| Some((position(left)?, position(right)?)));
        let (left, right) = match named {
            Some(pair) => pair,
            None if headers.len() >= 3 => (1, 2),
            None => {
                return Err(TabularError::MissingEndpointColumns {
                    columns: headers.len(),
                });
            }
        };
        Ok(Self {
            left,
            right,
            capacity: position(CAPACITY_COLUMN),
            disabled: position(DISABLED_COLUMN),
            base_fee: BASE_FEE_COLUMNS.iter().find_map(|name| position(name)),
        })
    }

    /// Header name of column `index`, for error messages.
    pub(crate) fn name(headers: &StringRecord, index: usize) -> String {
        headers
            .get(index)
            .map_or_else(|| format!("#{index}"), |name| name.trim().to_owned())
    }
}
