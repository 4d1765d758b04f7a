use price_forecast::data::PriceSeries;
use price_forecast::error::ForecastError;
use procura_math::MathError;
use std::io;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // Test math error conversion
    let math_error = MathError::InsufficientData("need two points".to_string());
    let forecast_error = ForecastError::from(math_error);
    match forecast_error {
        ForecastError::Math(MathError::InsufficientData(message)) => {
            assert_eq!(message, "need two points")
        }
        other => panic!("Expected Math variant, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::InsufficientHistory {
        required: 7,
        actual: 4,
    };
    assert_eq!(
        error.to_string(),
        "Insufficient history: need at least 7 points, got 4"
    );

    let error = ForecastError::InvalidPeriods(0);
    assert!(error.to_string().contains("got 0"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_csv_error_surfaces() {
    let csv = "date,price\n2024-01-01,not-a-number\n";
    let result = PriceSeries::from_reader(csv.as_bytes());
    assert!(matches!(result, Err(ForecastError::CsvError(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = PriceSeries::from_csv("/nonexistent/prices.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}
