//! The event-list selection manager.
//!
//! An [`EventList`] wraps an immutable [`EventStream`] and mutable selection
//! state:
//!
//! - an **active selection** (the signal region): per-channel observed
//!   counts, background-predicted counts once a fit exists, and live-time
//!   exposure
//! - a **background fit**: one polynomial per channel over the background
//!   intervals, in binned or unbinned estimation mode
//!
//! Both are immutable snapshots replaced atomically; a failed operation
//! leaves the previous state untouched.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    BackgroundSummary, EventStream, FitMode, IntervalSet, PolyInfo, PolyOrder, SpectrumContainer,
    Summary,
};
use crate::error::{Error, Result};
use crate::fit::{
    optimum_grade_binned, optimum_grade_unbinned, polyfit, run_channel_fits, unbinned_polyfit,
    ExecutionStrategy, Minimizer, MinimizerBackend,
};
use crate::math::{bin_edges, histogram, li_ma_significance, midpoints};
use crate::models::PolynomialModel;

/// Width of the light-curve bins used by the binned estimation mode, in the
/// stream's time units.
pub const BACKGROUND_BIN_WIDTH: f64 = 0.1;

/// Snapshot of the active (signal) selection.
#[derive(Debug, Clone)]
struct ActiveSelection {
    intervals: IntervalSet,
    counts: Vec<u64>,
    poly_counts: Option<Vec<f64>>,
    poly_count_errors: Option<Vec<f64>>,
    exposure: f64,
    dead_time: f64,
}

/// Snapshot of a completed background fit.
#[derive(Debug, Clone)]
struct BackgroundFit {
    intervals: IntervalSet,
    mode: FitMode,
    grade: usize,
    polynomials: Vec<PolynomialModel>,
}

/// Container for event-style data tagged with time and energy channel,
/// supporting signal/background time selections and per-channel polynomial
/// background fits.
pub struct EventList {
    stream: EventStream,
    backend: MinimizerBackend,
    minimizer: Arc<dyn Minimizer>,
    strategy: ExecutionStrategy,
    response_file: Option<String>,
    poly_order: PolyOrder,
    active: Option<ActiveSelection>,
    background: Option<BackgroundFit>,
}

impl EventList {
    pub fn new(stream: EventStream) -> Self {
        let backend = MinimizerBackend::default();
        let minimizer = backend.resolve();
        Self {
            stream,
            backend,
            minimizer,
            strategy: ExecutionStrategy::default(),
            response_file: None,
            poly_order: PolyOrder::Auto,
            active: None,
            background: None,
        }
    }

    /// Select the minimizer backend used for background fits.
    pub fn with_minimizer(mut self, backend: MinimizerBackend) -> Self {
        self.set_minimizer(backend);
        self
    }

    /// Select how per-channel fits are executed.
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Attach a response-file identifier passed through to the spectral
    /// container.
    pub fn with_response_file(mut self, response_file: impl Into<String>) -> Self {
        self.response_file = Some(response_file.into());
        self
    }

    pub fn set_minimizer(&mut self, backend: MinimizerBackend) {
        self.minimizer = backend.resolve();
        self.backend = backend;
    }

    pub fn minimizer_backend(&self) -> &MinimizerBackend {
        &self.backend
    }

    pub fn stream(&self) -> &EventStream {
        &self.stream
    }

    pub fn n_events(&self) -> usize {
        self.stream.n_events()
    }

    pub fn energies(&self) -> &[usize] {
        self.stream.energies()
    }

    pub fn has_active_selection(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_background_fit(&self) -> bool {
        self.background.is_some()
    }

    /// Set the time interval(s) to be used during the analysis, specified as
    /// `"tmin-tmax"` strings.
    ///
    /// Recomputes per-channel observed counts, background-predicted counts
    /// (when a fit exists), and dead-time-corrected exposure.
    pub fn set_active_time_intervals<S: AsRef<str>>(&mut self, specs: &[S]) -> Result<()> {
        let intervals = IntervalSet::from_strings(specs)?;
        let snapshot = self.build_active_selection(intervals, self.background.as_ref());
        self.active = Some(snapshot);
        Ok(())
    }

    /// Set the background fit interval(s) and estimation mode, then fit one
    /// polynomial per channel over them.
    ///
    /// An existing active selection is recomputed afterwards so its
    /// background-predicted counts reflect the new fit.
    pub fn set_background_fit_intervals<S: AsRef<str>>(
        &mut self,
        specs: &[S],
        mode: FitMode,
    ) -> Result<()> {
        let intervals = IntervalSet::from_strings(specs)?;
        let fitted = self.fit_background(intervals, mode, self.poly_order)?;
        self.install_background(fitted);
        Ok(())
    }

    pub fn poly_order(&self) -> PolyOrder {
        self.poly_order
    }

    /// Change the requested polynomial degree.
    ///
    /// Side effect: when a background fit already exists, the background is
    /// refitted immediately with the existing intervals and estimation mode.
    pub fn set_poly_order(&mut self, order: PolyOrder) -> Result<()> {
        let order = order.validate()?;
        match &self.background {
            Some(bkg) => {
                info!("refitting background with new polynomial order and existing selections");
                let (intervals, mode) = (bkg.intervals.clone(), bkg.mode);
                let fitted = self.fit_background(intervals, mode, order)?;
                self.poly_order = order;
                self.install_background(fitted);
            }
            None => self.poly_order = order,
        }
        Ok(())
    }

    /// The degree actually used by the current background fit.
    pub fn background_grade(&self) -> Result<usize> {
        Ok(self.require_background()?.grade)
    }

    /// The estimation mode of the current background fit.
    pub fn background_mode(&self) -> Result<FitMode> {
        Ok(self.require_background()?.mode)
    }

    /// Per-channel fitted background polynomials, in channel order.
    pub fn polynomials(&self) -> Result<&[PolynomialModel]> {
        Ok(&self.require_background()?.polynomials)
    }

    /// Per-channel polynomial coefficients and errors, for diagnostics.
    pub fn poly_info(&self) -> Result<Vec<PolyInfo>> {
        let background = self.require_background()?;
        Ok(background
            .polynomials
            .iter()
            .enumerate()
            .map(|(offset, poly)| PolyInfo {
                channel: self.stream.first_channel() + offset,
                coefficients: poly.coefficients().to_vec(),
                errors: poly.errors(),
            })
            .collect())
    }

    /// Build the spectral container for the downstream fitting pipeline.
    ///
    /// With `use_background` false the rates are observed counts over
    /// exposure with Poisson statistics; with it true they are the
    /// background model's predictions with Gaussian errors.
    pub fn spectrum(&self, use_background: bool) -> Result<SpectrumContainer> {
        let active = self.active.as_ref().ok_or(Error::MissingActiveSelection)?;
        let n_channels = self.stream.n_channels();

        if use_background {
            let (poly_counts, poly_errors) =
                match (&active.poly_counts, &active.poly_count_errors) {
                    (Some(counts), Some(errors)) => (counts, errors),
                    _ => return Err(Error::MissingBackgroundFit),
                };
            Ok(SpectrumContainer {
                rates: poly_counts.iter().map(|c| c / active.exposure).collect(),
                rate_errors: Some(poly_errors.iter().map(|e| e / active.exposure).collect()),
                n_channels,
                exposure: active.exposure,
                is_poisson: false,
                response_file: self.response_file.clone(),
            })
        } else {
            Ok(SpectrumContainer {
                rates: active
                    .counts
                    .iter()
                    .map(|&c| c as f64 / active.exposure)
                    .collect(),
                rate_errors: None,
                n_channels,
                exposure: active.exposure,
                is_poisson: true,
                response_file: self.response_file.clone(),
            })
        }
    }

    /// Read-only snapshot of the current selection state.
    pub fn summary(&self) -> Result<Summary> {
        let active = self.active.as_ref().ok_or(Error::MissingActiveSelection)?;
        let observed: u64 = active.counts.iter().sum();

        let background = self.background.as_ref().map(|bkg| {
            let predicted: f64 = active
                .poly_counts
                .as_ref()
                .map(|v| v.iter().sum())
                .unwrap_or(0.0);
            let error = active
                .poly_count_errors
                .as_ref()
                .map(|v| v.iter().map(|e| e * e).sum::<f64>().sqrt())
                .unwrap_or(0.0);
            BackgroundSummary {
                intervals: bkg.intervals.bounds(),
                grade: bkg.grade,
                mode: bkg.mode,
                predicted_counts: predicted,
                predicted_count_error: error,
                significance: li_ma_significance(observed as f64, predicted, 1.0),
            }
        });

        Ok(Summary {
            active_intervals: active.intervals.bounds(),
            exposure: active.exposure,
            dead_time: active.dead_time,
            total_events: self.stream.n_events(),
            active_counts: observed,
            n_channels: self.stream.n_channels(),
            background,
        })
    }

    fn require_background(&self) -> Result<&BackgroundFit> {
        self.background.as_ref().ok_or(Error::MissingBackgroundFit)
    }

    /// Compute a complete active-selection snapshot for the given intervals
    /// against the given background fit (if any).
    fn build_active_selection(
        &self,
        intervals: IntervalSet,
        background: Option<&BackgroundFit>,
    ) -> ActiveSelection {
        let mask = self.stream.union_mask(&intervals);
        let first = self.stream.first_channel();
        let n_channels = self.stream.n_channels();

        let mut counts = vec![0u64; n_channels];
        for (i, &channel) in self.stream.energies().iter().enumerate() {
            if mask[i] && channel >= first && channel < first + n_channels {
                counts[channel - first] += 1;
            }
        }

        let (poly_counts, poly_count_errors) = match background {
            Some(bkg) => {
                let mut predicted = Vec::with_capacity(n_channels);
                let mut errors = Vec::with_capacity(n_channels);
                for poly in &bkg.polynomials {
                    let mut total = 0.0;
                    let mut variance = 0.0;
                    for interval in intervals.iter() {
                        total += poly.integral(interval.tmin(), interval.tmax());
                        variance += poly
                            .integral_error(interval.tmin(), interval.tmax())
                            .powi(2);
                    }
                    predicted.push(total);
                    errors.push(variance.sqrt());
                }
                (Some(predicted), Some(errors))
            }
            None => (None, None),
        };

        let dead_time = self.stream.dead_time_in_mask(&mask);
        let exposure = intervals.total_duration() - dead_time;

        ActiveSelection {
            intervals,
            counts,
            poly_counts,
            poly_count_errors,
            exposure,
            dead_time,
        }
    }

    /// Swap in a fitted background and rebuild the active snapshot against
    /// it, since the background predictions feed the active selection.
    fn install_background(&mut self, fitted: BackgroundFit) {
        let active = self
            .active
            .as_ref()
            .map(|a| self.build_active_selection(a.intervals.clone(), Some(&fitted)));
        self.background = Some(fitted);
        if let Some(active) = active {
            self.active = Some(active);
        }
    }

    /// Fit one polynomial per channel over the background intervals.
    ///
    /// The shared degree comes from `order`, or from the likelihood-ratio
    /// selector run on the energy-summed data when `order` is `Auto`. Any
    /// single channel failure aborts the whole fit.
    fn fit_background(
        &self,
        intervals: IntervalSet,
        mode: FitMode,
        order: PolyOrder,
    ) -> Result<BackgroundFit> {
        let order = order.validate()?;
        let mask = self.stream.union_mask(&intervals);

        let mut bkg_times = Vec::new();
        let mut bkg_energies = Vec::new();
        for (i, &t) in self.stream.arrival_times().iter().enumerate() {
            if mask[i] {
                bkg_times.push(t);
                bkg_energies.push(self.stream.energies()[i]);
            }
        }

        let first = self.stream.first_channel();
        let n_channels = self.stream.n_channels();
        let minimizer = Arc::clone(&self.minimizer);

        let channel_times = |channel: usize| -> Vec<f64> {
            bkg_times
                .iter()
                .zip(&bkg_energies)
                .filter(|&(_, &e)| e == channel)
                .map(|(&t, _)| t)
                .collect()
        };

        let (grade, polynomials) = match mode {
            FitMode::Binned => {
                let edges = bin_edges(
                    self.stream.start_time(),
                    self.stream.stop_time(),
                    BACKGROUND_BIN_WIDTH,
                );
                if edges.len() < 2 {
                    return Err(Error::FitFailure {
                        channel: None,
                        reason: format!(
                            "event-stream span is too short to bin at {BACKGROUND_BIN_WIDTH} time units"
                        ),
                    });
                }
                let mids = midpoints(&edges);
                let exposures: Vec<f64> = edges
                    .windows(2)
                    .map(|pair| self.stream.exposure_over_interval(pair[0], pair[1]))
                    .collect();

                // Only bins whose midpoint falls inside the background
                // selection take part in the fit.
                let selected: Vec<usize> = mids
                    .iter()
                    .enumerate()
                    .filter(|&(_, &m)| intervals.contains(m))
                    .map(|(i, _)| i)
                    .collect();
                let sel_mids: Vec<f64> = selected.iter().map(|&i| mids[i]).collect();
                let sel_exps: Vec<f64> = selected.iter().map(|&i| exposures[i]).collect();

                let grade = match order {
                    PolyOrder::Fixed(d) => d,
                    PolyOrder::Auto => {
                        let summed = histogram(&bkg_times, &edges);
                        let sel_summed: Vec<f64> =
                            selected.iter().map(|&i| summed[i]).collect();
                        optimum_grade_binned(
                            &sel_mids,
                            &sel_summed,
                            &sel_exps,
                            minimizer.as_ref(),
                        )?
                    }
                };

                let polynomials = run_channel_fits(self.strategy, n_channels, |offset| {
                    let channel = first + offset;
                    let counts = histogram(&channel_times(channel), &edges);
                    let sel_counts: Vec<f64> = selected.iter().map(|&i| counts[i]).collect();
                    polyfit(&sel_mids, &sel_counts, grade, &sel_exps, minimizer.as_ref())
                        .map(|(model, _)| model)
                        .map_err(|e| tag_channel(e, channel))
                })?;

                (grade, polynomials)
            }
            FitMode::Unbinned => {
                let dead_time = self.stream.dead_time_in_mask(&mask);
                let exposure = intervals.total_duration() - dead_time;
                let starts = intervals.starts();
                let stops = intervals.stops();

                let grade = match order {
                    PolyOrder::Fixed(d) => d,
                    PolyOrder::Auto => optimum_grade_unbinned(
                        &bkg_times,
                        &starts,
                        &stops,
                        exposure,
                        minimizer.as_ref(),
                    )?,
                };

                let polynomials = run_channel_fits(self.strategy, n_channels, |offset| {
                    let channel = first + offset;
                    unbinned_polyfit(
                        &channel_times(channel),
                        grade,
                        &starts,
                        &stops,
                        exposure,
                        minimizer.as_ref(),
                    )
                    .map(|(model, _)| model)
                    .map_err(|e| tag_channel(e, channel))
                })?;

                (grade, polynomials)
            }
        };

        Ok(BackgroundFit {
            intervals,
            mode,
            grade,
            polynomials,
        })
    }
}

/// Attach the failing channel to a fit error that does not carry one yet.
fn tag_channel(err: Error, channel: usize) -> Error {
    match err {
        Error::FitFailure {
            channel: None,
            reason,
        } => Error::FitFailure {
            channel: Some(channel),
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{linear_trend_stream, uniform_stream};

    fn single_channel_list(seed: u64) -> EventList {
        EventList::new(uniform_stream(1000, 0.0, 100.0, 1, seed).unwrap())
    }

    #[test]
    fn rates_require_an_active_selection() {
        let list = single_channel_list(7);
        assert!(matches!(
            list.spectrum(false),
            Err(Error::MissingActiveSelection)
        ));
        assert!(matches!(list.summary(), Err(Error::MissingActiveSelection)));
    }

    #[test]
    fn background_products_require_a_fit() {
        let mut list = single_channel_list(7);
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        assert!(matches!(
            list.spectrum(true),
            Err(Error::MissingBackgroundFit)
        ));
        assert!(matches!(
            list.polynomials(),
            Err(Error::MissingBackgroundFit)
        ));
    }

    #[test]
    fn counts_sum_to_events_in_the_union() {
        let stream = uniform_stream(500, 0.0, 50.0, 4, 11).unwrap();
        let expected = stream
            .arrival_times()
            .iter()
            .filter(|&&t| (10.0..=20.0).contains(&t) || (30.0..=35.0).contains(&t))
            .count() as u64;

        let mut list = EventList::new(stream);
        list.set_active_time_intervals(&["10.0-20.0", "30.0-35.0"])
            .unwrap();
        let summary = list.summary().unwrap();
        assert_eq!(summary.active_counts, expected);
        assert!((summary.exposure - 15.0).abs() < 1e-12);
    }

    #[test]
    fn exposure_is_invariant_to_interval_order() {
        let mut a = single_channel_list(3);
        let mut b = single_channel_list(3);
        a.set_active_time_intervals(&["10.0-20.0", "30.0-35.0"])
            .unwrap();
        b.set_active_time_intervals(&["30.0-35.0", "10.0-20.0"])
            .unwrap();
        let sa = a.summary().unwrap();
        let sb = b.summary().unwrap();
        assert_eq!(sa.exposure, sb.exposure);
        assert_eq!(sa.active_counts, sb.active_counts);
    }

    #[test]
    fn dead_time_reduces_exposure() {
        let stream = uniform_stream(100, 0.0, 10.0, 1, 5).unwrap();
        let n = stream.n_events();
        let stream = stream.with_dead_time(vec![0.01; n]).unwrap();
        let in_union = stream
            .arrival_times()
            .iter()
            .filter(|&&t| (0.0..=10.0).contains(&t))
            .count();

        let mut list = EventList::new(stream);
        list.set_active_time_intervals(&["0.0-10.0"]).unwrap();
        let summary = list.summary().unwrap();
        assert!((summary.exposure - (10.0 - 0.01 * in_union as f64)).abs() < 1e-9);
        assert!((summary.dead_time - 0.01 * in_union as f64).abs() < 1e-9);
    }

    #[test]
    fn overlapping_intervals_leave_prior_selection_untouched() {
        let mut list = single_channel_list(1);
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        let before = list.summary().unwrap();

        let err = list
            .set_active_time_intervals(&["0.0-10.0", "5.0-15.0"])
            .unwrap_err();
        assert!(matches!(err, Error::OverlappingIntervals));
        assert_eq!(list.summary().unwrap(), before);
    }

    #[test]
    fn flat_background_scenario_binned() {
        let mut list = single_channel_list(42);
        list.set_poly_order(PolyOrder::Fixed(0)).unwrap();
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        list.set_background_fit_intervals(&["0.0-40.0"], FitMode::Binned)
            .unwrap();

        let summary = list.summary().unwrap();
        assert!((summary.exposure - 20.0).abs() < 1e-12);
        assert_eq!(list.background_grade().unwrap(), 0);

        // 1000 events over [0,100]: the flat model integrated over a
        // 20-unit window predicts ~200 counts, within Poisson noise.
        let predicted = list.polynomials().unwrap()[0].integral(40.0, 60.0);
        assert!(
            (predicted - 200.0).abs() < 40.0,
            "predicted {predicted}, expected ~200"
        );

        let spectrum = list.spectrum(true).unwrap();
        assert!(!spectrum.is_poisson);
        assert!((spectrum.rates[0] - predicted / 20.0).abs() < 1e-9);
        assert!(spectrum.rate_errors.as_ref().unwrap()[0] > 0.0);
    }

    #[test]
    fn flat_background_scenario_unbinned() {
        let mut list = single_channel_list(42);
        list.set_poly_order(PolyOrder::Fixed(0)).unwrap();
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        list.set_background_fit_intervals(&["0.0-40.0"], FitMode::Unbinned)
            .unwrap();

        assert_eq!(list.background_mode().unwrap(), FitMode::Unbinned);
        let predicted = list.polynomials().unwrap()[0].integral(40.0, 60.0);
        assert!(
            (predicted - 200.0).abs() < 40.0,
            "predicted {predicted}, expected ~200"
        );
    }

    #[test]
    fn observed_rates_are_poisson() {
        let mut list = single_channel_list(9);
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        let spectrum = list.spectrum(false).unwrap();
        assert!(spectrum.is_poisson);
        assert!(spectrum.rate_errors.is_none());
        let summary = list.summary().unwrap();
        assert!(
            (spectrum.rates[0] - summary.active_counts as f64 / summary.exposure).abs() < 1e-12
        );
    }

    #[test]
    fn forced_degree_round_trip() {
        for k in 0..=4 {
            let mut list = single_channel_list(21);
            list.set_poly_order(PolyOrder::fixed(k).unwrap()).unwrap();
            list.set_background_fit_intervals(&["0.0-60.0"], FitMode::Unbinned)
                .unwrap();
            assert_eq!(list.background_grade().unwrap(), k);
        }
    }

    #[test]
    fn invalid_degree_is_rejected() {
        let mut list = single_channel_list(2);
        assert!(matches!(
            list.set_poly_order(PolyOrder::Fixed(5)),
            Err(Error::InvalidDegree { requested: 5 })
        ));
    }

    #[test]
    fn auto_selects_flat_for_constant_rate() {
        // Evenly spaced arrivals: exactly one event per 0.1-unit bin, so no
        // higher degree can improve the likelihood.
        let times: Vec<f64> = (0..1000).map(|i| (i as f64 + 0.5) * 0.1).collect();
        let energies = vec![0usize; times.len()];
        let stream = EventStream::new(times, energies, 1)
            .unwrap()
            .with_span(0.0, 100.0);

        let mut list = EventList::new(stream);
        list.set_background_fit_intervals(&["0.0-100.0"], FitMode::Binned)
            .unwrap();
        assert_eq!(list.background_grade().unwrap(), 0);
    }

    #[test]
    fn auto_detects_linear_trend() {
        let stream = linear_trend_stream(5.0, 0.6, 0.0, 100.0, 1, 23).unwrap();
        let mut list = EventList::new(stream);
        list.set_background_fit_intervals(&["0.0-100.0"], FitMode::Binned)
            .unwrap();
        assert!(
            list.background_grade().unwrap() >= 1,
            "grade {} for a strong linear trend",
            list.background_grade().unwrap()
        );
    }

    #[test]
    fn changing_poly_order_refits_existing_background() {
        let mut list = single_channel_list(29);
        list.set_poly_order(PolyOrder::Fixed(0)).unwrap();
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        list.set_background_fit_intervals(&["0.0-40.0"], FitMode::Unbinned)
            .unwrap();
        assert_eq!(list.background_grade().unwrap(), 0);

        list.set_poly_order(PolyOrder::Fixed(2)).unwrap();
        assert_eq!(list.background_grade().unwrap(), 2);
        assert_eq!(list.background_mode().unwrap(), FitMode::Unbinned);
        // The active selection was recomputed against the new fit.
        let summary = list.summary().unwrap();
        assert!(summary.background.unwrap().grade == 2);
    }

    #[test]
    fn sharded_strategy_matches_sequential() {
        let stream = uniform_stream(2000, 0.0, 100.0, 4, 31).unwrap();
        let mut sequential = EventList::new(stream.clone());
        let mut sharded = EventList::new(stream)
            .with_execution_strategy(ExecutionStrategy::Sharded { workers: 3 });

        sequential.set_poly_order(PolyOrder::Fixed(1)).unwrap();
        sharded.set_poly_order(PolyOrder::Fixed(1)).unwrap();
        sequential
            .set_background_fit_intervals(&["0.0-100.0"], FitMode::Unbinned)
            .unwrap();
        sharded
            .set_background_fit_intervals(&["0.0-100.0"], FitMode::Unbinned)
            .unwrap();

        let a = sequential.polynomials().unwrap();
        let b = sharded.polynomials().unwrap();
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(b) {
            assert_eq!(pa.coefficients(), pb.coefficients());
        }
    }

    #[test]
    fn summary_reports_background_diagnostics() {
        let mut list = single_channel_list(13);
        list.set_active_time_intervals(&["40.0-60.0"]).unwrap();
        list.set_background_fit_intervals(&["0.0-40.0", "60.0-100.0"], FitMode::Unbinned)
            .unwrap();

        let summary = list.summary().unwrap();
        let background = summary.background.unwrap();
        assert_eq!(background.intervals.len(), 2);
        assert!(background.predicted_counts > 0.0);
        assert!(background.predicted_count_error >= 0.0);
        assert!(background.significance.is_some());
    }

    #[test]
    fn poly_info_reports_channel_coefficients() {
        let stream = uniform_stream(1200, 0.0, 100.0, 3, 37)
            .unwrap()
            .with_first_channel(2);
        let mut list = EventList::new(stream);
        list.set_poly_order(PolyOrder::Fixed(0)).unwrap();
        list.set_background_fit_intervals(&["0.0-100.0"], FitMode::Unbinned)
            .unwrap();

        let info = list.poly_info().unwrap();
        assert_eq!(info.len(), 3);
        assert_eq!(info[0].channel, 2);
        assert_eq!(info[2].channel, 4);
        for channel in &info {
            assert_eq!(channel.coefficients.len(), 1);
            assert_eq!(channel.errors.len(), 1);
        }
    }

    #[test]
    fn response_file_flows_into_the_container() {
        let mut list = single_channel_list(3).with_response_file("glg_cspec_n6.rsp");
        list.set_active_time_intervals(&["0.0-100.0"]).unwrap();
        let spectrum = list.spectrum(false).unwrap();
        assert_eq!(spectrum.response_file.as_deref(), Some("glg_cspec_n6.rsp"));
    }
}
