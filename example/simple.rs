use fixflow::prelude::*;

/// ```text
/// entry:  s = 0; i = 0          -> header
/// header: i < n ?               -> body, exit
/// body:   s = s + i; i = i + 1  -> header
/// exit:   out = s * 2
/// ```
fn sum_to_n() -> Function {
    FunctionBuilder::new("sum_to_n")
        .block(
            BlockBuilder::new("entry")
                .store(0i64, "s")
                .store(0i64, "i")
                .br("header"),
        )
        .block(
            BlockBuilder::new("header")
                .load("t0", "i")
                .load("t1", "n")
                .compare("c", "t0", "t1")
                .cond_br("c", "body", "exit"),
        )
        .block(
            BlockBuilder::new("body")
                .load("t2", "s")
                .load("t3", "i")
                .add("t4", "t2", "t3")
                .store("t4", "s")
                .load("t5", "i")
                .add("t6", "t5", 1i64)
                .store("t6", "i")
                .br("header"),
        )
        .block(
            BlockBuilder::new("exit")
                .load("t7", "s")
                .mul("t8", "t7", 2i64)
                .store("t8", "out")
                .ret(),
        )
        .finish()
}

fn main() -> Result<(), AnalysisError> {
    let function = sum_to_n();
    let config = AnalysisConfig::default();

    if let Some(result) = analyze(&AvailableExpressions, &function, &config)? {
        print!("{}", result.report());
    }
    if let Some(result) = analyze(&Liveness, &function, &config)? {
        print!("{}", result.report());
        print!("{}", result.dump());
    }
    Ok(())
}
