use fixflow::prelude::*;
use fixflow_test_utils::fixtures;

fn report<A: DataflowAnalysis>(analysis: &A, function: &Function) -> String {
    analyze(analysis, function, &AnalysisConfig::default())
        .unwrap()
        .unwrap()
        .report()
        .to_string()
}

#[test]
fn test_straight_line() {
    insta::assert_snapshot!(report(&AvailableExpressions, &fixtures::straight_line()), @r"
    available-expressions: straight_line
    ----- entry -----
    Available: a+b
    ");
    insta::assert_snapshot!(report(&Liveness, &fixtures::straight_line()), @r"
    liveness: straight_line
    ----- entry -----
    Live-out:
    ");
}

#[test]
fn test_load_sub_store() {
    let result = analyze(&Liveness, &fixtures::load_sub_store(), &AnalysisConfig::default())
        .unwrap()
        .unwrap();
    let local = result.local();
    assert_eq!(local.generated("entry").unwrap().to_string(), "x y");
    assert_eq!(local.killed("entry").unwrap().to_string(), "z");
    assert!(result.result("entry").unwrap().is_empty());
}

#[test]
fn test_counting_loop() {
    insta::assert_snapshot!(report(&AvailableExpressions, &fixtures::counting_loop()), @r"
    available-expressions: counting_loop
    ----- entry -----
    Available:
    ----- header -----
    Available:
    ----- body -----
    Available:
    ----- exit -----
    Available: s*2
    ");
    insta::assert_snapshot!(report(&Liveness, &fixtures::counting_loop()), @r"
    liveness: counting_loop
    ----- entry -----
    Live-out: s
    ----- header -----
    Live-out: s
    ----- body -----
    Live-out: s
    ----- exit -----
    Live-out:
    ");
}

#[test]
fn test_sample_module() {
    let module = fixtures::sample_module();
    let config = AnalysisConfig::default();
    let analyzed: Vec<String> = analyze_module(&Liveness, &module.functions, &config)
        .into_iter()
        .filter(|outcome| matches!(outcome.result, Ok(Some(_))))
        .map(|outcome| outcome.function.to_string())
        .collect();
    assert_eq!(
        analyzed,
        [
            "straight_line",
            "diamond",
            "load_sub_store",
            "self_loop",
            "counting_loop"
        ]
    );
}
