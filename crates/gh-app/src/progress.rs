/// Progress of a transient run, emitted at every recorded sample.
#[derive(Debug, Clone, Default)]
pub struct RunProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
    pub samples: usize,
}

impl RunProgress {
    pub fn new(sim_time_s: f64, t_end_s: f64, step: usize, samples: usize) -> Self {
        let fraction_complete = if t_end_s > 0.0 {
            (sim_time_s / t_end_s).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            sim_time_s,
            t_end_s,
            fraction_complete,
            step,
            samples,
        }
    }
}
