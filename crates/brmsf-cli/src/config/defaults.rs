use brmsf::engine::config::{DEFAULT_ALPHA, DEFAULT_ITERATIONS, DEFAULT_MEAN_STD_SAMPLE_SIZE};

pub struct DefaultsConfig {
    pub iterations: usize,
    pub alpha: f64,
    pub mean_std_sample_size: usize,
    pub atom_names: Vec<String>,
    pub plot_width: u32,
    pub plot_height: u32,
    pub start_resid: isize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            alpha: DEFAULT_ALPHA,
            mean_std_sample_size: DEFAULT_MEAN_STD_SAMPLE_SIZE,
            atom_names: vec!["CA".to_string()],
            plot_width: 1200,
            plot_height: 400,
            start_resid: 0,
        }
    }
}
