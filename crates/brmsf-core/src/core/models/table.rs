use std::fmt;

/// Which statistic columns a [`ResultTable`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Baseline RMSF with a pivot confidence interval: `rmsf`, `low`, `high`.
    Pivot,
    /// Ensemble mean and population standard deviation: `mean`, `std`.
    MeanStd,
}

impl TableKind {
    pub const PIVOT_COLUMNS: [&'static str; 6] = ["resid", "resname", "segid", "rmsf", "low", "high"];
    pub const MEAN_STD_COLUMNS: [&'static str; 5] = ["resid", "resname", "segid", "mean", "std"];

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Pivot => &Self::PIVOT_COLUMNS,
            TableKind::MeanStd => &Self::MEAN_STD_COLUMNS,
        }
    }

    /// Name of the column plotted as the central line.
    pub fn statistic_column(&self) -> &'static str {
        match self {
            TableKind::Pivot => "rmsf",
            TableKind::MeanStd => "mean",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Pivot => write!(f, "pivot interval"),
            TableKind::MeanStd => write!(f, "mean/std"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowStatistic {
    Interval { rmsf: f64, low: f64, high: f64 },
    MeanStd { mean: f64, std: f64 },
}

impl RowStatistic {
    pub fn kind(&self) -> TableKind {
        match self {
            RowStatistic::Interval { .. } => TableKind::Pivot,
            RowStatistic::MeanStd { .. } => TableKind::MeanStd,
        }
    }

    /// The central value: `rmsf` or `mean`.
    pub fn value(&self) -> f64 {
        match *self {
            RowStatistic::Interval { rmsf, .. } => rmsf,
            RowStatistic::MeanStd { mean, .. } => mean,
        }
    }

    /// Lower and upper edge of the uncertainty band.
    ///
    /// For mean/std rows the band is `mean ± std` with the lower edge clipped at zero.
    pub fn band(&self) -> (f64, f64) {
        match *self {
            RowStatistic::Interval { low, high, .. } => (low, high),
            RowStatistic::MeanStd { mean, std } => ((mean - std).max(0.0), mean + std),
        }
    }
}

/// One output row per distinct `(resid, resname, segid)` residue key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub resid: isize,
    pub resname: String,
    pub segid: String,
    pub statistic: RowStatistic,
}

/// Per-residue result of one bootstrap run, sorted by `(segid, resid)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    kind: TableKind,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(kind: TableKind, rows: Vec<ResultRow>) -> Self {
        Self { kind, rows }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Largest central value in the table, `None` when empty.
    pub fn max_value(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|row| row.statistic.value())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}
