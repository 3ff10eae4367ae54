use fixflow_analysis::*;
use fixflow_ir::{BlockBuilder, Function, FunctionBuilder};
use fixflow_test_utils::fixtures;

fn run(function: &Function) -> FunctionAnalysis<Variable> {
    analyze(&Liveness, function, &AnalysisConfig::default())
        .unwrap()
        .unwrap()
}

fn live_out(result: &FunctionAnalysis<Variable>, block: &str) -> String {
    result.result(block).unwrap().to_string()
}

#[test]
fn test_load_sub_store() {
    let result = run(&fixtures::load_sub_store());
    let generated = result.local().generated("entry").unwrap();
    assert!(generated.contains(&Variable::from("x")));
    assert!(generated.contains(&Variable::from("y")));
    assert_eq!(result.local().killed("entry").unwrap().to_string(), "z");
    // No successors, so nothing is live on exit whatever the block uses.
    assert!(result.result("entry").unwrap().is_empty());
    assert_eq!(result.solution().input("entry").unwrap().to_string(), "x y");
}

#[test]
fn test_diamond() {
    let result = run(&fixtures::diamond());
    insta::assert_snapshot!(result.report().to_string(), @r"
    liveness: diamond
    ----- b1 -----
    Live-out: t w x
    ----- b2 -----
    Live-out: t w
    ----- b3 -----
    Live-out: t w
    ----- b4 -----
    Live-out:
    ");
    assert_eq!(result.solution().input("b1").unwrap().to_string(), "w x y");
}

#[test]
fn test_live_out_is_union_of_successor_inputs() {
    let result = run(&fixtures::diamond());
    let solution = result.solution();
    let expected = fixflow_ir::Lattice::join(
        solution.input("b2").unwrap(),
        solution.input("b3").unwrap(),
    );
    assert_eq!(solution.output("b1"), Some(&expected));
}

#[test]
fn test_self_loop_converges() {
    let result = run(&fixtures::self_loop());
    // `n` is both read and written in `spin`; the write masks the read.
    assert!(result.local().generated("spin").unwrap().is_empty());
    assert_eq!(live_out(&result, "spin"), "");
    assert!(result.solution().passes() <= 2);
}

#[test]
fn test_counting_loop() {
    let result = run(&fixtures::counting_loop());
    assert_eq!(live_out(&result, "entry"), "s");
    assert_eq!(live_out(&result, "header"), "s");
    assert_eq!(live_out(&result, "body"), "s");
    assert_eq!(live_out(&result, "exit"), "");
    assert_eq!(result.solution().passes(), 2);
}

#[test]
fn test_compared_values_are_not_live() {
    // Known modelling choice: `header` only compares `i` and `n`, and a
    // comparison discards its staged loads, so neither is live into it.
    let result = run(&fixtures::counting_loop());
    let header_in = result.solution().input("header").unwrap();
    assert!(!header_in.contains(&Variable::from("i")));
    assert!(!header_in.contains(&Variable::from("n")));
}

#[test]
fn test_use_flows_backwards_through_chain() {
    let function = FunctionBuilder::new("f")
        .block(BlockBuilder::new("a").br("b"))
        .block(BlockBuilder::new("b").br("c"))
        .block(
            BlockBuilder::new("c")
                .load("t0", "v")
                .add("t1", "t0", 1i64)
                .store("t1", "w")
                .ret(),
        )
        .finish();
    let result = run(&function);
    assert_eq!(live_out(&result, "a"), "v");
    assert_eq!(live_out(&result, "b"), "v");
    assert_eq!(live_out(&result, "c"), "");
}

#[test]
fn test_definition_stops_liveness() {
    let function = FunctionBuilder::new("f")
        .block(BlockBuilder::new("entry").store(1i64, "v").br("use"))
        .block(
            BlockBuilder::new("use")
                .load("t0", "v")
                .mul("t1", "t0", "t0")
                .store("t1", "w")
                .ret(),
        )
        .finish();
    let result = run(&function);
    assert_eq!(live_out(&result, "entry"), "v");
    assert!(result.solution().input("entry").unwrap().is_empty());
}

#[test]
fn test_malformed_store_fails_the_function() {
    let store = fixflow_ir::Instruction::builder()
        .opcode(fixflow_ir::Opcode::Store)
        .operands(vec![fixflow_ir::Operand::from("t0")])
        .new();
    let function = FunctionBuilder::new("f")
        .block(BlockBuilder::new("entry").inst(store).ret())
        .finish();
    let err = analyze(&Liveness, &function, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::MissingOperand {
            function: "f".into(),
            block: "entry".into(),
            index: 0,
            opcode: fixflow_ir::Opcode::Store,
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn test_branch_inside_block_fails_the_function() {
    let function = FunctionBuilder::new("f")
        .block(BlockBuilder::new("entry").br("exit").store(1i64, "q"))
        .block(
            BlockBuilder::new("exit")
                .load("t0", "v")
                .add("t1", "t0", 1i64)
                .ret(),
        )
        .finish();
    let err = analyze(&Liveness, &function, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::MisplacedTerminator {
            function: "f".into(),
            block: "entry".into(),
            index: 0,
            opcode: fixflow_ir::Opcode::Branch,
        }
    );
}

/// Liveness reported on block entry instead of exit.
struct LiveIn;

impl DataflowAnalysis for LiveIn {
    type Fact = Variable;

    fn name(&self) -> &'static str {
        "live-in"
    }

    fn label(&self) -> &'static str {
        "Live-in"
    }

    fn local_sets<V: fixflow_ir::FunctionView>(
        &self,
        function: &V,
        cfg: &Cfg,
    ) -> Result<LocalSets<Variable>, AnalysisError> {
        Liveness.local_sets(function, cfg)
    }

    fn problem(&self, cfg: &Cfg) -> Problem<Variable> {
        Liveness.problem(cfg)
    }

    fn reported(&self) -> Side {
        Side::In
    }
}

#[test]
fn test_reporting_block_inputs() {
    let result = analyze(&LiveIn, &fixtures::diamond(), &AnalysisConfig::default())
        .unwrap()
        .unwrap();
    assert_eq!(result.results(), result.solution().inputs());
    insta::assert_snapshot!(result.report().to_string(), @r"
    live-in: diamond
    ----- b1 -----
    Live-in: w x y
    ----- b2 -----
    Live-in: t x
    ----- b3 -----
    Live-in: t w x
    ----- b4 -----
    Live-in: t w
    ");
}
