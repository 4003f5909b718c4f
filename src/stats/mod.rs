pub mod descriptive;
pub mod gini;
pub mod rounding;

pub use descriptive::{
    mean, median, population_std_dev, population_variance, quantile, quartiles, tukey_fences,
};
pub use gini::gini_coefficient;
pub use rounding::{round_decimal, round_to};
