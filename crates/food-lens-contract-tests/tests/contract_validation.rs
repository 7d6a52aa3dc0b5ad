//! Validates fixtures and generated payloads against frozen JSON schemas.

use food_lens_analysis_contract::{
    ChatRequest, GestureResult, NutritionAdvice, mock_food_analysis, parse_analysis_result,
};
use food_lens_contract_tests::{compile_schema, load_fixture};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn analysis_fixture_matches_schema_and_parser() {
    let validator = compile_schema("analysis-response");
    let fixture = load_fixture("analysis-response.valid.json");
    assert!(
        validator.is_valid(&fixture),
        "analysis fixture should validate against schema"
    );

    let parsed = parse_analysis_result(&fixture.to_string()).expect("fixture should parse");
    assert_eq!(parsed.foods.len(), 2);
}

#[test]
fn invalid_analysis_fixture_is_rejected_by_schema_and_parser() {
    let validator = compile_schema("analysis-response");
    let fixture = load_fixture("analysis-response.invalid.json");
    assert!(!validator.is_valid(&fixture));
    assert!(parse_analysis_result(&fixture.to_string()).is_err());
}

#[test]
fn generated_mock_analyses_match_schema() {
    let validator = compile_schema("analysis-response");
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..25 {
        let result = mock_food_analysis(&mut rng);
        let value = serde_json::to_value(&result).expect("mock result should serialize");
        assert!(validator.is_valid(&value), "mock result {value} should validate");
    }
}

#[test]
fn gesture_payloads_match_schema() {
    let validator = compile_schema("gesture-response");
    assert!(validator.is_valid(&load_fixture("gesture-response.valid.json")));

    let fallback = serde_json::to_value(GestureResult::none()).expect("should serialize");
    assert!(validator.is_valid(&fallback));
}

#[test]
fn chat_request_matches_schema() {
    let validator = compile_schema("chat-request");
    let request = ChatRequest {
        message: "What should I eat after a run?".to_string(),
        context: None,
    };
    let value = serde_json::to_value(&request).expect("request should serialize");
    assert!(validator.is_valid(&value));
    assert!(value["context"].is_null());
}

#[test]
fn nutrition_advice_payloads_match_schema() {
    let validator = compile_schema("nutrition-advice");
    let fixture = load_fixture("nutrition-advice.valid.json");
    assert!(validator.is_valid(&fixture));

    let decoded: NutritionAdvice =
        serde_json::from_value(fixture).expect("fixture should decode");
    assert_eq!(decoded.recommendations.len(), 2);

    let fallback = serde_json::to_value(NutritionAdvice::generic()).expect("should serialize");
    assert!(validator.is_valid(&fallback));
}
