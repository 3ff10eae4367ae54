//! Small functions shared by the analysis, facade and CLI tests.

use fixflow_ir::{BlockBuilder, Function, FunctionBuilder, Module};

/// One block computing `a+b` twice and storing the first result to `c`.
pub fn straight_line() -> Function {
    FunctionBuilder::new("straight_line")
        .block(
            BlockBuilder::new("entry")
                .load("t0", "a")
                .load("t1", "b")
                .add("t2", "t0", "t1")
                .load("t3", "a")
                .load("t4", "b")
                .add("t5", "t3", "t4")
                .store("t2", "c")
                .ret(),
        )
        .finish()
}

/// `b1` computes `x+y` and branches to `b2` and `b3`, which join in `b4`.
///
/// `b2` computes `x*2`; `b3` computes `x*2` and then overwrites `y`, killing
/// `x+y` on that path only.
pub fn diamond() -> Function {
    FunctionBuilder::new("diamond")
        .block(
            BlockBuilder::new("b1")
                .load("t0", "x")
                .load("t1", "y")
                .add("t2", "t0", "t1")
                .store("t2", "t")
                .compare("c", "t0", 0i64)
                .cond_br("c", "b2", "b3"),
        )
        .block(
            BlockBuilder::new("b2")
                .load("t3", "x")
                .mul("t4", "t3", 2i64)
                .store("t4", "w")
                .br("b4"),
        )
        .block(
            BlockBuilder::new("b3")
                .load("t5", "x")
                .mul("t6", "t5", 2i64)
                .store(5i64, "y")
                .br("b4"),
        )
        .block(
            BlockBuilder::new("b4")
                .load("t7", "w")
                .load("t8", "t")
                .add("t9", "t7", "t8")
                .store("t9", "r")
                .ret(),
        )
        .finish()
}

/// Loads `x` and `y`, stores `x-y` to `z`, and returns.
pub fn load_sub_store() -> Function {
    FunctionBuilder::new("load_sub_store")
        .block(
            BlockBuilder::new("entry")
                .load("t0", "x")
                .load("t1", "y")
                .sub("t2", "t0", "t1")
                .store("t2", "z")
                .ret(),
        )
        .finish()
}

/// A single block whose only successor is itself.
pub fn self_loop() -> Function {
    FunctionBuilder::new("self_loop")
        .block(
            BlockBuilder::new("spin")
                .load("t0", "n")
                .sub("t1", "t0", 1i64)
                .store("t1", "n")
                .br("spin"),
        )
        .finish()
}

/// `i` counts up to `n` while `s` accumulates `s+i`.
///
/// ```text
/// entry -> header -> body -> header
///          header -> exit
/// ```
pub fn counting_loop() -> Function {
    FunctionBuilder::new("counting_loop")
        .block(
            BlockBuilder::new("entry")
                .store(0i64, "i")
                .store(0i64, "s")
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

/// A program driver, skipped by default.
pub fn main_function() -> Function {
    FunctionBuilder::new("main")
        .block(
            BlockBuilder::new("entry")
                .load("t0", "argc")
                .add("t1", "t0", 1i64)
                .store("t1", "argc")
                .ret(),
        )
        .finish()
}

/// A function whose terminator names a block it does not define.
pub fn dangling_branch() -> Function {
    FunctionBuilder::new("dangling_branch")
        .block(BlockBuilder::new("entry").br("nowhere"))
        .finish()
}

/// Every fixture above, in declaration order.
pub fn sample_module() -> Module {
    Module::new(vec![
        main_function(),
        straight_line(),
        diamond(),
        load_sub_store(),
        self_loop(),
        counting_loop(),
        dangling_branch(),
    ])
}
