#[cfg(feature = "plot")]
use crate::plot::PlotError;
use crate::readings::ReadingsError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `readings` module")]
    Readings(#[from] ReadingsError),
    #[cfg(feature = "plot")]
    #[error("Error in the `plot` module")]
    Plot(#[from] PlotError),
}
