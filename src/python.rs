//! Python bindings (`python` feature)

use crate::core::params::{DEFAULT_CU, DEFAULT_ENHANCED_CMAX, DEFAULT_ENHANCED_CU, DEFAULT_ENHANCED_K};
use crate::core::speckle_filter;
use crate::types::{SpeckleError, SpeckleResult};
use numpy::{PyReadonlyArray2, ToPyArray};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(err: SpeckleError) -> PyErr {
    match err {
        SpeckleError::Parameter(_) | SpeckleError::EmptyImage { .. } => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn filtered_to_numpy(py: Python, filtered: SpeckleResult<ndarray::Array2<f64>>) -> PyResult<PyObject> {
    let filtered = filtered.map_err(to_py_err)?;
    Ok(filtered.to_pyarray(py).into())
}

/// Lee filter over a 2-D float64 array
#[pyfunction]
#[pyo3(signature = (image, win_size = 3, cu = DEFAULT_CU))]
fn lee_filter(py: Python, image: PyReadonlyArray2<f64>, win_size: usize, cu: f64) -> PyResult<PyObject> {
    let array = image.as_array().to_owned();
    filtered_to_numpy(py, speckle_filter::lee_filter(&array, win_size, cu))
}

/// Kuan filter over a 2-D float64 array
#[pyfunction]
#[pyo3(signature = (image, win_size = 3, cu = DEFAULT_CU))]
fn kuan_filter(py: Python, image: PyReadonlyArray2<f64>, win_size: usize, cu: f64) -> PyResult<PyObject> {
    let array = image.as_array().to_owned();
    filtered_to_numpy(py, speckle_filter::kuan_filter(&array, win_size, cu))
}

/// Enhanced Lee filter over a 2-D float64 array
#[pyfunction]
#[pyo3(signature = (
    image,
    win_size = 3,
    k = DEFAULT_ENHANCED_K,
    cu = DEFAULT_ENHANCED_CU,
    cmax = DEFAULT_ENHANCED_CMAX
))]
fn lee_enhanced_filter(
    py: Python,
    image: PyReadonlyArray2<f64>,
    win_size: usize,
    k: f64,
    cu: f64,
    cmax: f64,
) -> PyResult<PyObject> {
    let array = image.as_array().to_owned();
    filtered_to_numpy(py, speckle_filter::lee_enhanced_filter(&array, win_size, k, cu, cmax))
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(lee_filter, m)?)?;
    m.add_function(wrap_pyfunction!(kuan_filter, m)?)?;
    m.add_function(wrap_pyfunction!(lee_enhanced_filter, m)?)?;
    Ok(())
}
