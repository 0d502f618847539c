use std::collections::BTreeMap;
use std::path::PathBuf;

use listingkit_core::{
    EnumRatioType, ReportProcess, SpecGroupOutcome, collapse_spaces, deduplicate_words,
    detect_ratio_type_from_titles, extract_base_title, normalize_title, remove_numeric_suffix,
    replace_hyphens, replace_underscores,
};
use listingkit_io_fs::OutputPathError;
use listingkit_io_xlsx::{XlsxIoError, process_file};
use pyo3::exceptions::{PyFileNotFoundError, PyOSError, PyPermissionError, PyValueError};
use pyo3::prelude::*;

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "listingkit.process_file.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "SpecGroupOutcome")]
#[derive(Debug, Clone)]
struct PySpecGroupOutcome {
    #[pyo3(get)]
    n_group: usize,
    #[pyo3(get)]
    row_first: u32,
    #[pyo3(get)]
    row_last: u32,
    #[pyo3(get)]
    ratio: String,
}

impl From<SpecGroupOutcome> for PySpecGroupOutcome {
    fn from(outcome: SpecGroupOutcome) -> Self {
        Self {
            n_group: outcome.n_group,
            row_first: outcome.row_first,
            row_last: outcome.row_last,
            ratio: outcome.ratio.label().to_string(),
        }
    }
}

#[pyclass(name = "ReportProcess")]
#[derive(Debug, Clone)]
struct PyReportProcess {
    #[pyo3(get)]
    cnt_groups: u64,
    #[pyo3(get)]
    cnt_rows: u64,
    #[pyo3(get)]
    cnt_rows_dropped: u64,
    #[pyo3(get)]
    groups: Vec<PySpecGroupOutcome>,
    #[pyo3(get)]
    warnings: Vec<String>,
    #[pyo3(get)]
    file_out: String,
    dict_counts: BTreeMap<String, u64>,
}

impl PyReportProcess {
    fn new(report: ReportProcess, path_output: PathBuf) -> Self {
        let dict_counts = report.to_dict();
        Self {
            cnt_groups: report.cnt_groups,
            cnt_rows: report.cnt_rows,
            cnt_rows_dropped: report.cnt_rows_dropped,
            groups: report
                .groups
                .into_iter()
                .map(PySpecGroupOutcome::from)
                .collect(),
            warnings: report.warnings,
            file_out: path_output.to_string_lossy().to_string(),
            dict_counts,
        }
    }
}

#[pymethods]
impl PyReportProcess {
    #[getter]
    fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.dict_counts.clone()
    }

    #[pyo3(signature = (prefix = "[PROCESS]"))]
    fn format(&self, prefix: &str) -> String {
        let count = |key: &str| self.dict_counts.get(key).copied().unwrap_or_default();
        format!(
            "{prefix} groups={} rows={} dropped={} square={} three_to_two={} warnings={}",
            self.cnt_groups,
            self.cnt_rows,
            self.cnt_rows_dropped,
            count("cnt_square"),
            count("cnt_three_to_two"),
            self.warning_count()
        )
    }

    fn __str__(&self) -> String {
        self.format("[PROCESS]")
    }
}

fn parse_rule_ratio(value: &str) -> PyResult<EnumRatioType> {
    match value {
        "square" => Ok(EnumRatioType::Square),
        "3:2" => Ok(EnumRatioType::ThreeToTwo),
        _ => Err(PyValueError::new_err(format!(
            "Invalid ratio: `{value}`. Expected one of: ['square', '3:2']"
        ))),
    }
}

fn map_xlsx_io_error(exception: XlsxIoError) -> PyErr {
    match exception {
        XlsxIoError::Io(err) if err.kind() == std::io::ErrorKind::NotFound => {
            PyFileNotFoundError::new_err(err.to_string())
        }
        XlsxIoError::OutputPath(err @ OutputPathError::OutputLocked { .. }) => {
            PyPermissionError::new_err(err.to_string())
        }
        err @ (XlsxIoError::Io(_) | XlsxIoError::OutputPath(_)) => {
            PyOSError::new_err(err.to_string())
        }
        err => PyValueError::new_err(err.to_string()),
    }
}

#[pyfunction(name = "process_file")]
#[pyo3(signature = (file_in, file_out = None))]
fn process_file_py(
    py: Python<'_>,
    file_in: PathBuf,
    file_out: Option<PathBuf>,
) -> PyResult<PyReportProcess> {
    let outcome = py.allow_threads(|| process_file(&file_in, file_out.as_deref()));
    let outcome = outcome.map_err(map_xlsx_io_error)?;
    Ok(PyReportProcess::new(outcome.report, outcome.path_output))
}

#[pyfunction(name = "normalize_title")]
#[pyo3(signature = (base_title, index, ratio = "3:2"))]
fn normalize_title_py(base_title: &str, index: usize, ratio: &str) -> PyResult<String> {
    if index > 10 {
        return Err(PyValueError::new_err(format!(
            "Invalid index: {index}. Expected 0..=10"
        )));
    }
    Ok(normalize_title(base_title, index, parse_rule_ratio(ratio)?))
}

#[pyfunction(name = "detect_ratio_type_from_titles")]
fn detect_ratio_type_from_titles_py(titles: Vec<String>) -> &'static str {
    detect_ratio_type_from_titles(&titles).label()
}

#[pyfunction(name = "collapse_spaces")]
fn collapse_spaces_py(text: &str) -> String {
    collapse_spaces(text)
}

#[pyfunction(name = "extract_base_title")]
fn extract_base_title_py(title: &str) -> String {
    extract_base_title(title)
}

#[pyfunction(name = "remove_numeric_suffix")]
fn remove_numeric_suffix_py(text: &str) -> String {
    remove_numeric_suffix(text)
}

#[pyfunction(name = "replace_hyphens")]
fn replace_hyphens_py(text: &str) -> String {
    replace_hyphens(text)
}

#[pyfunction(name = "replace_underscores")]
fn replace_underscores_py(text: &str) -> String {
    replace_underscores(text)
}

#[pyfunction(name = "deduplicate_words")]
fn deduplicate_words_py(text: &str) -> String {
    deduplicate_words(text)
}

#[pymodule]
fn _listingkit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PySpecGroupOutcome>()?;
    module.add_class::<PyReportProcess>()?;
    module.add_function(wrap_pyfunction!(process_file_py, module)?)?;
    module.add_function(wrap_pyfunction!(normalize_title_py, module)?)?;
    module.add_function(wrap_pyfunction!(detect_ratio_type_from_titles_py, module)?)?;
    module.add_function(wrap_pyfunction!(collapse_spaces_py, module)?)?;
    module.add_function(wrap_pyfunction!(extract_base_title_py, module)?)?;
    module.add_function(wrap_pyfunction!(remove_numeric_suffix_py, module)?)?;
    module.add_function(wrap_pyfunction!(replace_hyphens_py, module)?)?;
    module.add_function(wrap_pyfunction!(replace_underscores_py, module)?)?;
    module.add_function(wrap_pyfunction!(deduplicate_words_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
