use crate::core::models::atom::ResidueKey;
use crate::core::models::selection::AtomSelection;
use crate::core::models::table::{ResultRow, ResultTable, RowStatistic, TableKind};
use crate::core::utils::statistics::{percentile_sorted, sort_ascending};
use crate::engine::config::IntervalStrategy;
use crate::engine::ensemble::BootstrapEnsemble;
use crate::engine::error::EngineError;
use std::collections::BTreeMap;
use tracing::instrument;

/// Per-atom baseline with its pivot confidence interval.
///
/// For each atom the deviations `replicate - baseline` are sorted and
/// `low = baseline + P(100 * alpha)`, `high = baseline + P(100 * (1 - alpha))`
/// with linear-interpolation percentiles.
pub fn pivot_interval(
    baseline: &[f64],
    ensemble: &BootstrapEnsemble,
    alpha: f64,
) -> Result<Vec<RowStatistic>, EngineError> {
    if !(alpha > 0.0 && alpha < 0.5) {
        return Err(EngineError::invalid_input(format!(
            "alpha {} is outside the open interval (0, 0.5)",
            alpha
        )));
    }
    check_ensemble(ensemble)?;
    if baseline.len() != ensemble.n_atoms() {
        return Err(EngineError::invalid_input(format!(
            "baseline has {} atoms but the ensemble has {}",
            baseline.len(),
            ensemble.n_atoms()
        )));
    }

    baseline
        .iter()
        .zip(ensemble.matrix().row_iter())
        .map(|(&rmsf, replicates)| {
            let mut deviations: Vec<f64> = replicates.iter().map(|v| v - rmsf).collect();
            sort_ascending(&mut deviations);
            let lower = percentile_sorted(&deviations, 100.0 * alpha);
            let upper = percentile_sorted(&deviations, 100.0 * (1.0 - alpha));
            match (lower, upper) {
                (Some(lower), Some(upper)) => Ok(RowStatistic::Interval {
                    rmsf,
                    low: rmsf + lower,
                    high: rmsf + upper,
                }),
                _ => Err(EngineError::Internal(
                    "percentile of an empty replicate row".to_string(),
                )),
            }
        })
        .collect()
}

/// Per-atom mean and population standard deviation of the replicates.
pub fn mean_std(ensemble: &BootstrapEnsemble) -> Result<Vec<RowStatistic>, EngineError> {
    check_ensemble(ensemble)?;
    // nalgebra's variance divides by n.
    Ok(ensemble
        .matrix()
        .row_iter()
        .map(|replicates| RowStatistic::MeanStd {
            mean: replicates.mean(),
            std: replicates.variance().sqrt(),
        })
        .collect())
}

fn check_ensemble(ensemble: &BootstrapEnsemble) -> Result<(), EngineError> {
    if ensemble.n_atoms() == 0 {
        return Err(EngineError::invalid_input("the ensemble holds no atoms"));
    }
    if ensemble.n_iterations() == 0 {
        return Err(EngineError::invalid_input(
            "the ensemble holds no bootstrap iterations",
        ));
    }
    Ok(())
}

#[derive(Default)]
struct StatisticSum {
    count: usize,
    values: [f64; 3],
}

impl StatisticSum {
    fn add(&mut self, statistic: &RowStatistic) {
        let values = match *statistic {
            RowStatistic::Interval { rmsf, low, high } => [rmsf, low, high],
            RowStatistic::MeanStd { mean, std } => [mean, std, 0.0],
        };
        for (sum, value) in self.values.iter_mut().zip(values) {
            *sum += value;
        }
        self.count += 1;
    }

    fn average(&self, kind: TableKind) -> RowStatistic {
        let n = self.count as f64;
        let [a, b, c] = self.values.map(|v| v / n);
        match kind {
            TableKind::Pivot => RowStatistic::Interval {
                rmsf: a,
                low: b,
                high: c,
            },
            TableKind::MeanStd => RowStatistic::MeanStd { mean: a, std: b },
        }
    }
}

/// Averages per-atom statistics over atoms sharing `(resid, resname, segid)`.
///
/// Rows come out sorted by segid, then resid, then resname.
pub fn group_by_residue(
    selection: &AtomSelection,
    statistics: &[RowStatistic],
    kind: TableKind,
) -> Result<ResultTable, EngineError> {
    if selection.is_empty() {
        return Err(EngineError::invalid_input("the atom selection is empty"));
    }
    if statistics.len() != selection.len() {
        return Err(EngineError::invalid_input(format!(
            "{} statistics for a selection of {} atoms",
            statistics.len(),
            selection.len()
        )));
    }
    if let Some(other) = statistics.iter().find(|s| s.kind() != kind) {
        return Err(EngineError::Internal(format!(
            "a {} statistic cannot enter a {} table",
            other.kind(),
            kind
        )));
    }

    let mut groups: BTreeMap<ResidueKey, StatisticSum> = BTreeMap::new();
    for (atom, statistic) in selection.atoms().iter().zip(statistics) {
        groups
            .entry(atom.info.residue_key())
            .or_default()
            .add(statistic);
    }

    let rows = groups
        .into_iter()
        .map(|(key, sum)| ResultRow {
            resid: key.resid,
            resname: key.resname,
            segid: key.segid,
            statistic: sum.average(kind),
        })
        .collect();
    Ok(ResultTable::new(kind, rows))
}

/// Reduces an ensemble to a per-residue table with the chosen strategy.
///
/// The pivot strategy requires `baseline`; the mean/std strategy ignores it.
#[instrument(skip_all, name = "aggregate_task")]
pub fn aggregate(
    strategy: IntervalStrategy,
    selection: &AtomSelection,
    baseline: Option<&[f64]>,
    ensemble: &BootstrapEnsemble,
) -> Result<ResultTable, EngineError> {
    if ensemble.n_atoms() != selection.len() {
        return Err(EngineError::invalid_input(format!(
            "ensemble has {} atoms but the selection has {}",
            ensemble.n_atoms(),
            selection.len()
        )));
    }
    match strategy {
        IntervalStrategy::Pivot { alpha } => {
            let baseline = baseline.ok_or_else(|| {
                EngineError::invalid_input("the pivot interval requires a baseline RMSF")
            })?;
            let statistics = pivot_interval(baseline, ensemble, alpha)?;
            group_by_residue(selection, &statistics, TableKind::Pivot)
        }
        IntervalStrategy::MeanStd => {
            let statistics = mean_std(ensemble)?;
            group_by_residue(selection, &statistics, TableKind::MeanStd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomInfo;
    use crate::core::models::selection::SelectedAtom;

    const TOLERANCE: f64 = 1e-12;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn selection(atoms: &[(isize, &str, &str)]) -> AtomSelection {
        AtomSelection::new(
            atoms
                .iter()
                .enumerate()
                .map(|(index, &(resid, resname, segid))| SelectedAtom {
                    index,
                    info: AtomInfo::new(index + 1, "CA", resid, resname, segid),
                })
                .collect(),
        )
    }

    #[test]
    fn degenerate_ensemble_collapses_interval_to_baseline() {
        let baseline = vec![0.8, 1.7];
        let ensemble = BootstrapEnsemble::from_columns(&vec![baseline.clone(); 50]).unwrap();
        let stats = pivot_interval(&baseline, &ensemble, 0.05).unwrap();
        for (stat, &b) in stats.iter().zip(&baseline) {
            assert_eq!(
                *stat,
                RowStatistic::Interval {
                    rmsf: b,
                    low: b,
                    high: b
                }
            );
        }
    }

    #[test]
    fn pivot_interval_uses_linear_percentiles_of_deviations() {
        // deviations 0, 1, 2, 3, 4 around baseline 10
        let columns: Vec<Vec<f64>> = [14.0, 10.0, 12.0, 11.0, 13.0]
            .iter()
            .map(|&v| vec![v])
            .collect();
        let ensemble = BootstrapEnsemble::from_columns(&columns).unwrap();
        let stats = pivot_interval(&[10.0], &ensemble, 0.05).unwrap();
        let RowStatistic::Interval { rmsf, low, high } = stats[0] else {
            panic!("expected interval");
        };
        assert_eq!(rmsf, 10.0);
        assert!(f64_approx_equal(low, 10.2));
        assert!(f64_approx_equal(high, 13.8));
    }

    #[test]
    fn alpha_outside_open_interval_is_invalid_input() {
        let ensemble = BootstrapEnsemble::from_columns(&[vec![1.0]]).unwrap();
        for alpha in [0.0, 0.5, 1.0, -0.05] {
            assert!(matches!(
                pivot_interval(&[1.0], &ensemble, alpha),
                Err(EngineError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn mean_std_uses_population_deviation() {
        let columns: Vec<Vec<f64>> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .map(|&v| vec![v])
            .collect();
        let ensemble = BootstrapEnsemble::from_columns(&columns).unwrap();
        let stats = mean_std(&ensemble).unwrap();
        let RowStatistic::MeanStd { mean, std } = stats[0] else {
            panic!("expected mean/std");
        };
        assert!(f64_approx_equal(mean, 5.0));
        assert!(f64_approx_equal(std, 2.0));
    }

    #[test]
    fn mean_std_reduces_each_atom_row_separately() {
        // Sample std of [1, 2, 3, 4] would be sqrt(5/3); the population form is sqrt(5/4).
        let columns: Vec<Vec<f64>> = [1.0, 2.0, 3.0, 4.0].iter().map(|&v| vec![v, 7.0]).collect();
        let ensemble = BootstrapEnsemble::from_columns(&columns).unwrap();
        let stats = mean_std(&ensemble).unwrap();
        assert_eq!(stats.len(), 2);
        let RowStatistic::MeanStd { mean, std } = stats[0] else {
            panic!("expected mean/std");
        };
        assert!(f64_approx_equal(mean, 2.5));
        assert!(f64_approx_equal(std, 1.25_f64.sqrt()));
        assert_eq!(stats[1], RowStatistic::MeanStd { mean: 7.0, std: 0.0 });
    }

    #[test]
    fn mean_std_of_empty_ensemble_is_invalid_input() {
        let ensemble = BootstrapEnsemble::from_columns(&[]).unwrap();
        assert!(matches!(
            mean_std(&ensemble),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn atoms_sharing_a_residue_are_averaged() {
        let sel = selection(&[(5, "ALA", "A"), (5, "ALA", "A"), (6, "GLY", "A")]);
        let stats = [
            RowStatistic::MeanStd { mean: 1.0, std: 0.2 },
            RowStatistic::MeanStd { mean: 3.0, std: 0.4 },
            RowStatistic::MeanStd { mean: 0.5, std: 0.1 },
        ];
        let table = group_by_residue(&sel, &stats, TableKind::MeanStd).unwrap();
        assert_eq!(table.len(), 2);
        let row = &table.rows()[0];
        assert_eq!((row.resid, row.resname.as_str(), row.segid.as_str()), (5, "ALA", "A"));
        let RowStatistic::MeanStd { mean, std } = row.statistic else {
            panic!("expected mean/std");
        };
        assert!(f64_approx_equal(mean, 2.0));
        assert!(f64_approx_equal(std, 0.3));
    }

    #[test]
    fn rows_sort_by_segid_before_resid() {
        let sel = selection(&[(1, "MET", "B"), (2, "ALA", "A"), (1, "MET", "A")]);
        let stats = [RowStatistic::MeanStd { mean: 1.0, std: 0.0 }; 3];
        let table = group_by_residue(&sel, &stats, TableKind::MeanStd).unwrap();
        let order: Vec<_> = table
            .rows()
            .iter()
            .map(|r| (r.segid.as_str(), r.resid))
            .collect();
        assert_eq!(order, vec![("A", 1), ("A", 2), ("B", 1)]);
    }

    #[test]
    fn empty_selection_is_invalid_input() {
        let err = group_by_residue(&AtomSelection::default(), &[], TableKind::Pivot).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn aggregate_pivot_without_baseline_is_invalid_input() {
        let sel = selection(&[(1, "ALA", "A")]);
        let ensemble = BootstrapEnsemble::from_columns(&[vec![1.0], vec![2.0]]).unwrap();
        let err = aggregate(IntervalStrategy::Pivot { alpha: 0.05 }, &sel, None, &ensemble)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn aggregate_builds_table_of_requested_kind() {
        let sel = selection(&[(1, "ALA", "A"), (2, "GLY", "A")]);
        let ensemble =
            BootstrapEnsemble::from_columns(&[vec![1.0, 2.0], vec![3.0, 2.0]]).unwrap();
        let table = aggregate(IntervalStrategy::MeanStd, &sel, None, &ensemble).unwrap();
        assert_eq!(table.kind(), TableKind::MeanStd);
        assert_eq!(table.rows()[0].statistic, RowStatistic::MeanStd { mean: 2.0, std: 1.0 });
        assert_eq!(table.rows()[1].statistic, RowStatistic::MeanStd { mean: 2.0, std: 0.0 });

        let pivot = aggregate(
            IntervalStrategy::Pivot { alpha: 0.25 },
            &sel,
            Some(&[2.0, 2.0]),
            &ensemble,
        )
        .unwrap();
        assert_eq!(pivot.kind(), TableKind::Pivot);
    }
}
