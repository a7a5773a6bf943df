//! Tests for equation-driven linear regression

use approx::{assert_abs_diff_eq, assert_relative_eq};
use indexmap::IndexMap;
use ndarray::array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::*;
use canopy_core::ErrorKind;
use canopy_core::data::Series;

// ==================== Test Fixtures ====================

fn frame(columns: Vec<(&str, Vec<f64>)>) -> DataFrame {
    DataFrame::from_columns(columns.into_iter().map(|(n, v)| (n, Series::float(v)))).unwrap()
}

fn xy_aliases() -> AliasMap {
    AliasMap::new().with("X", "x").with("Y", "y")
}

/// Five points with a hand-computed fit: b0 = 0.6, b1 = 0.8, RSS = 3.6
fn small_data() -> DataFrame {
    frame(vec![
        ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ("y", vec![1.0, 3.0, 2.0, 5.0, 4.0]),
    ])
}

/// Y = 2 + 3X + N(0, 0.5)
fn noisy_linear_data(n: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.5).unwrap();
    let x: Vec<f64> = (0..n).map(|_| rng.random_range(5.0..40.0)).collect();
    let y: Vec<f64> = x.iter().map(|&xi| 2.0 + 3.0 * xi + noise.sample(&mut rng)).collect();
    frame(vec![("x", x), ("y", y)])
}

/// Volume from a log-linear model: ln(V) = -2 + 2.5 ln(DAP) + N(0, 0.5)
fn log_linear_data(n: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.5).unwrap();
    let dap: Vec<f64> = (0..n).map(|_| rng.random_range(15.0..30.0)).collect();
    let vol: Vec<f64> = dap
        .iter()
        .map(|&d| (-2.0 + 2.5 * d.ln() + noise.sample(&mut rng)).exp())
        .collect();
    frame(vec![("dap_cm", dap), ("vol_m3", vol)])
}

// ==================== OLS ====================

#[test]
fn test_fit_hand_computed_statistics() {
    let result = fit_formula(&small_data(), "Y = b0 + b1*X", &xy_aliases()).unwrap();
    let stats = &result.statistics;

    assert_eq!(result.method, FitMethod::Ols);
    assert_abs_diff_eq!(result.coefficients["const"], 0.6, epsilon = 1e-10);
    assert_abs_diff_eq!(result.coefficients["X"], 0.8, epsilon = 1e-10);

    assert_abs_diff_eq!(stats.r_squared, 0.64, epsilon = 1e-10);
    assert_abs_diff_eq!(stats.r2_adjusted, 0.52, epsilon = 1e-10);
    assert_abs_diff_eq!(stats.rmse, 1.2_f64.sqrt(), epsilon = 1e-10);
    assert_abs_diff_eq!(stats.syx_percent, 1.2_f64.sqrt() / 3.0 * 100.0, epsilon = 1e-8);
    assert_abs_diff_eq!(stats.durbin_watson.unwrap(), 12.76 / 3.6, epsilon = 1e-10);

    let llf = -2.5 * ((2.0 * std::f64::consts::PI * 3.6 / 5.0).ln() + 1.0);
    assert_abs_diff_eq!(stats.log_likelihood.unwrap(), llf, epsilon = 1e-10);
    assert_abs_diff_eq!(stats.aic.unwrap(), -2.0 * llf + 4.0, epsilon = 1e-10);
    assert_abs_diff_eq!(stats.bic.unwrap(), -2.0 * llf + 2.0 * 5.0_f64.ln(), epsilon = 1e-10);

    assert_eq!(stats.n_observations, 5);
    assert_eq!(stats.df_resid, Some(3));
    assert_eq!(stats.bias_correction_factor, None);
    assert_eq!(stats.rmse_real, None);
}

#[test]
fn test_fit_coefficient_inference() {
    let result = fit_formula(&small_data(), "Y = b0 + b1*X", &xy_aliases()).unwrap();
    let table = &result.coefficient_table;

    assert_eq!(table.len(), 2);
    assert!(table[0].is_intercept);
    assert_eq!(table[1].name, "X");

    // var(b1) = σ² / Sxx = 1.2 / 10, var(b0) = σ² (1/n + x̄²/Sxx) = 1.32
    assert_abs_diff_eq!(table[1].std_error.unwrap(), 0.12_f64.sqrt(), epsilon = 1e-8);
    assert_abs_diff_eq!(table[0].std_error.unwrap(), 1.32_f64.sqrt(), epsilon = 1e-8);
    assert_abs_diff_eq!(table[1].t_stat.unwrap(), 0.8 / 0.12_f64.sqrt(), epsilon = 1e-6);

    let p = table[1].p_value.unwrap();
    assert!(p > 0.05 && p < 0.2, "p-value {p}");
    assert!(table[1].ci_lower.unwrap() < 0.8 && table[1].ci_upper.unwrap() > 0.8);
}

#[test]
fn test_fit_confidence_level_is_configurable() {
    let half_width = |level: f64| {
        let config = LinearConfig {
            confidence_level: level,
        };
        let result = fit_formula_with(
            &small_data(),
            "Y = b0 + b1*X",
            &xy_aliases(),
            &canopy_core::ScreeningConfig::default(),
            &config,
        )
        .unwrap();
        let slope = &result.coefficient_table[1];
        (slope.ci_upper.unwrap() - slope.ci_lower.unwrap()) / 2.0
    };

    // t quantiles with 3 degrees of freedom
    let se = 0.12_f64.sqrt();
    assert_abs_diff_eq!(half_width(0.95), 3.182446 * se, epsilon = 1e-3);
    assert_abs_diff_eq!(half_width(0.99), 5.840909 * se, epsilon = 1e-3);
}

#[test]
fn test_fit_recovers_synthetic_line() {
    let data = noisy_linear_data(100, 42);
    let result = fit_formula(&data, "Y = b0 + b1*X", &xy_aliases()).unwrap();

    assert_abs_diff_eq!(result.coefficients["const"], 2.0, epsilon = 0.5);
    assert_abs_diff_eq!(result.coefficients["X"], 3.0, epsilon = 0.05);
    assert!(result.statistics.r2_adjusted > 0.95);
    assert_eq!(result.fitted_values.len(), result.observed_values.len());
    assert_eq!(result.rows.len(), result.statistics.n_observations);
}

#[test]
fn test_fit_without_intercept() {
    let data = frame(vec![
        ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ("y", vec![2.0, 4.1, 5.9, 8.0, 10.1]),
    ]);
    let result = fit_formula(&data, "Y = b1*X", &xy_aliases()).unwrap();

    assert!(!result.coefficients.contains_key("const"));
    assert_abs_diff_eq!(result.coefficients["X"], 2.0, epsilon = 0.05);
    // uncentred R² with n / (n - k)
    let stats = &result.statistics;
    assert_abs_diff_eq!(
        stats.r2_adjusted,
        1.0 - 5.0 / 4.0 * (1.0 - stats.r_squared),
        epsilon = 1e-12
    );
    assert_eq!(result.equation_fitted.split(" = ").next(), Some("Y"));
}

#[test]
fn test_fit_uses_screened_rows() {
    let mut x: Vec<f64> = (1..=20).map(f64::from).collect();
    let mut y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
    x.push(-3.0);
    y.push(10.0);
    x.push(4000.0);
    y.push(8.0);
    let data = frame(vec![("x", x), ("y", y)]);

    let result = fit_formula(&data, "Y = b0 + b1*X", &xy_aliases()).unwrap();
    assert_eq!(result.statistics.n_observations, 20);
    assert_eq!(result.rows, (0..20).collect::<Vec<_>>());
    assert_abs_diff_eq!(result.coefficients["X"], 2.0, epsilon = 1e-8);
}

#[test]
fn test_fit_transformed_terms() {
    let dap: Vec<f64> = (1..=12).map(|i| 8.0 + 2.0 * f64::from(i)).collect();
    let ht: Vec<f64> = dap.iter().map(|d| 5.0 + 0.4 * d).collect();
    let vol: Vec<f64> = dap
        .iter()
        .zip(&ht)
        .map(|(d, h)| 0.01 + 0.00004 * d * d * h)
        .collect();
    let data = frame(vec![("dap", dap), ("ht", ht), ("vol", vol)]);
    let aliases = AliasMap::new()
        .with("DAP", "dap")
        .with("HT", "ht")
        .with("Y", "vol");

    let result = fit_formula(&data, "Y = b0 + b1 * (DAP**2 * HT)", &aliases).unwrap();
    let labels: Vec<&str> = result.coefficients.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["const", "DAP**2*HT"]);
    assert_abs_diff_eq!(result.coefficients["DAP**2*HT"], 0.00004, epsilon = 1e-9);
}

// ==================== Log models ====================

#[test]
fn test_log_fit_bias_correction() {
    let data = log_linear_data(2000, 7);
    let aliases = AliasMap::new().with("DAP", "dap_cm").with("Y", "vol_m3");

    let result = fit_formula(&data, "ln(Y) = b0 + b1*ln(DAP)", &aliases).unwrap();
    let stats = &result.statistics;

    assert!(result.is_log);
    assert!(result.equation_fitted.starts_with("ln(Y) = "));
    assert_abs_diff_eq!(result.coefficients["ln(DAP)"], 2.5, epsilon = 0.3);

    let fc = stats.bias_correction_factor.unwrap();
    assert_relative_eq!(fc, (stats.rmse * stats.rmse / 2.0).exp(), max_relative = 1e-12);
    assert!(fc > 1.0);

    // fitted and observed stay on the log scale, the real-scale copies are
    // back-transformed with the factor
    for (real, log) in result.predicted_real.iter().zip(&result.fitted_values) {
        assert_relative_eq!(*real, log.exp() * fc, max_relative = 1e-12);
    }
    for (real, log) in result.observed_real.iter().zip(&result.observed_values) {
        assert_relative_eq!(real.ln(), *log, max_relative = 1e-12);
    }

    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    let observed_mean = mean(&result.observed_real);
    let corrected = mean(&result.predicted_real);
    let uncorrected = corrected / fc;
    assert!((corrected - observed_mean).abs() < (uncorrected - observed_mean).abs());

    let rmse_real = stats.rmse_real.unwrap();
    assert_relative_eq!(
        stats.syx_percent,
        rmse_real / observed_mean * 100.0,
        max_relative = 1e-10
    );
}

#[test]
fn test_log_fit_metric_rows() {
    let data = log_linear_data(50, 11);
    let aliases = AliasMap::new().with("DAP", "dap_cm").with("Y", "vol_m3");
    let result = fit_formula(&data, "ln(Y) = b0 + b1*ln(DAP)", &aliases).unwrap();

    let metrics: Vec<String> = result.metric_rows().into_iter().map(|r| r.metric).collect();
    assert_eq!(
        metrics,
        vec!["R² adjusted", "Syx %", "RMSE (log scale)", "Meyer factor", "AIC", "Durbin-Watson"]
    );

    let linear = fit_formula(&small_data(), "Y = b0 + b1*X", &xy_aliases()).unwrap();
    let rows = linear.metric_rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].value, "0.5200");
    assert_eq!(rows[2].metric, "RMSE");
}

// ==================== Equation string ====================

#[test]
fn test_fitted_equation_format() {
    let data = frame(vec![
        ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ("y", vec![8.5, 7.0, 5.5, 4.0, 2.5]),
    ]);
    let result = fit_formula(&data, "Y = b0 + b1*X", &xy_aliases()).unwrap();
    assert_eq!(result.equation_fitted, "Y = 10.0000 - 1.5000*(X)");
    assert_eq!(result.equation_original, "Y = b0 + b1*X");

    let coefficients: IndexMap<String, f64> = [
        ("ln(DAP)".to_string(), 2.0),
        ("const".to_string(), -9.87654),
        ("ln(HT)".to_string(), 0.5),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        fitted_equation("ln(V)", &coefficients),
        "ln(V) = 2.0000*(ln(DAP)) - 9.8765 + 0.5000*(ln(HT))"
    );
}

// ==================== Diagnostics ====================

#[test]
fn test_durbin_watson() {
    assert_abs_diff_eq!(
        Diagnostics::durbin_watson(&array![1.0, -1.0, 1.0, -1.0]),
        3.0,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        Diagnostics::durbin_watson(&array![1.0, 1.0, 1.0, 1.0]),
        0.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_syx_percent_zero_mean() {
    assert_eq!(Diagnostics::syx_percent(1.5, 0.0), 0.0);
    assert_abs_diff_eq!(Diagnostics::syx_percent(1.5, 10.0), 15.0, epsilon = 1e-12);
}

#[test]
fn test_back_transform() {
    let fitted = array![0.0, 1.0];
    let real = Diagnostics::back_transform(&fitted, 1.1);
    assert_abs_diff_eq!(real[0], 1.1, epsilon = 1e-12);
    assert_abs_diff_eq!(real[1], std::f64::consts::E * 1.1, epsilon = 1e-12);
    assert_abs_diff_eq!(Diagnostics::bias_correction_factor(0.02), 0.01_f64.exp(), epsilon = 1e-15);
}

#[test]
fn test_ols_dimension_mismatch() {
    let x = array![[1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
    let err = LinearRegression::new()
        .fit(&x, &array![1.0, 2.0], true)
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::DimensionMismatch));
}

#[test]
fn test_ols_exactly_determined() {
    let x = array![[1.0, 1.0], [1.0, 2.0]];
    let estimate = LinearRegression::new()
        .fit(&x, &array![3.0, 5.0], true)
        .unwrap();
    assert_eq!(estimate.df_resid, 0);
    assert!(estimate.standard_errors.is_none());
    assert_abs_diff_eq!(estimate.coefficients[1], 2.0, epsilon = 1e-10);
}

// ==================== Failures ====================

#[test]
fn test_fit_errors() {
    let data = small_data();
    let aliases = xy_aliases();

    let kind = |equation: &str| fit_formula(&data, equation, &aliases).unwrap_err().kind();
    assert_eq!(kind("Y b0 + b1*X"), Some(ErrorKind::Format));
    assert_eq!(kind("Y = b0 + b1*UNKNOWN_ALIAS"), Some(ErrorKind::AliasResolution));
    assert_eq!(kind("Z = b0 + b1*X"), Some(ErrorKind::AliasResolution));
    assert_eq!(kind("Y = b0 + b1*sin(X)"), Some(ErrorKind::TermEvaluation));

    let tiny = frame(vec![("x", vec![1.0, 2.0]), ("y", vec![3.0, 4.0])]);
    let err = fit_formula(&tiny, "Y = b0 + b1*X", &aliases).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InsufficientData));
}

// ==================== Output ====================

#[test]
fn test_result_serializes_flat_statistics() {
    let result = fit_formula(&small_data(), "Y = b0 + b1*X", &xy_aliases()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["method"], "Ols");
    assert_eq!(json["name"], DEFAULT_MODEL_NAME);
    assert!(json["r2_adjusted"].is_number());
    assert!(json["bias_correction_factor"].is_null());
    assert_eq!(json["alias_map_used"]["X"], "x");
}

#[test]
fn test_result_display() {
    let result = fit_formula(&small_data(), "Y = b0 + b1*X", &xy_aliases())
        .unwrap()
        .with_name("Linear");
    let text = result.to_string();

    assert!(text.starts_with("Model: Linear (Ordinary Least Squares)"));
    assert!(text.contains("Y = 0.6000 + 0.8000*(X)"));
    assert!(text.contains("Durbin-Watson"));
    assert!(text.contains("Residuals:"));
}
