use ndarray::{Array2, Array3, ArrayD, ArrayView4, Axis, Ix4};

use crate::error::{MitoselError, Result};
use crate::volume::Volume;

/// Depth-collapsed time series plus its time-collapsed map.
#[derive(Clone, Debug)]
pub struct Projections {
    /// Max over depth, shape = (rows, cols, time).
    pub series: Array3<f32>,
    /// Max over depth and time, shape = (rows, cols).
    pub flat: Array2<f32>,
}

/// Maximum-intensity projection across the depth axis.
///
/// Returns one 2D frame per time step stacked as `(rows, cols, time)`.
pub fn max_project_depth(data: ArrayView4<f32>) -> Array3<f32> {
    data.fold_axis(Axis(2), f32::NEG_INFINITY, |&acc, &v| acc.max(v))
}

/// Maximum-intensity projection of a time series across time.
pub fn max_project_time(series: &Array3<f32>) -> Array2<f32> {
    series.fold_axis(Axis(2), f32::NEG_INFINITY, |&acc, &v| acc.max(v))
}

/// Project a loaded volume to both the time series and the flat map.
pub fn project(volume: &Volume) -> Projections {
    let series = max_project_depth(volume.data.view());
    let flat = max_project_time(&series);
    Projections { series, flat }
}

/// Depth projection for arrays whose dimensionality is only known at runtime.
pub fn max_project_depth_dyn(data: &ArrayD<f32>) -> Result<Array3<f32>> {
    let view = data
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| MitoselError::InputShape {
            expected: "4 axes (rows, cols, depth, time)".into(),
            found: format!("{} axes", data.ndim()),
        })?;
    if view.shape().contains(&0) {
        return Err(MitoselError::InputShape {
            expected: "non-empty axes".into(),
            found: format!("{:?}", view.shape()),
        });
    }
    Ok(max_project_depth(view))
}
