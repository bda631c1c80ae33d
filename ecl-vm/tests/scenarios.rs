//! The six concrete stdout scenarios from spec.md §8, each built as a small
//! in-memory ECL image and run to completion through the real scheduler.

mod support;

use ecl_vm::context::Difficulty;
use ecl_vm::{ExecutionContext, Scheduler};
use support::{build_image, build_sub, Op};

fn run(image: &ecl_vm::EclImage, difficulty: Difficulty) -> String {
    let mut ctx = ExecutionContext::with_seed(difficulty, 1);
    let mut sched = Scheduler::new(image).unwrap();
    let mut out = Vec::new();
    sched.run(&mut ctx, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn hello_world() {
    let main = build_sub(vec![Op::Printstr("hi"), Op::Ret]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "hi\n");
}

#[test]
fn arithmetic() {
    let main = build_sub(vec![
        Op::Stackalloc(4),
        Op::Push(3),
        Op::Push(4),
        Op::Addi,
        Op::Printtop,
        Op::Ret,
    ]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "7\n");
}

#[test]
fn conditional_branch_taken() {
    // STACKALLOC 4; PUSH 0; JMPEQ @yes; PRINTSTR "no"; RET; @yes PRINTSTR "yes"; RET
    let main = build_sub(vec![
        Op::Stackalloc(4),
        Op::Push(0),
        Op::Jmpeq(5),
        Op::Printstr("no"),
        Op::Ret,
        Op::Printstr("yes"),
        Op::Ret,
    ]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "yes\n");
}

#[test]
fn conditional_branch_not_taken() {
    let main = build_sub(vec![
        Op::Stackalloc(4),
        Op::Push(1),
        Op::Jmpeq(5),
        Op::Printstr("no"),
        Op::Ret,
        Op::Printstr("yes"),
        Op::Ret,
    ]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "no\n");
}

#[test]
fn loop_three_times() {
    // STACKALLOC 4; PUSH 3; SET $A; @L PRINTSTR "x"; DECI $A; JMPEQ @end; JMP @L; @end RET
    let main = build_sub(vec![
        Op::Stackalloc(4),
        Op::Push(3),
        Op::Set(0),
        Op::Printstr("x"),
        Op::Deci(0),
        Op::Jmpeq(7),
        Op::Jmp(3),
        Op::Ret,
    ]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "x\nx\nx\n");
}

#[test]
fn async_ordering() {
    // main: CALLASYNC "child"; PRINTSTR "P"; RET
    // child: WAIT 0; PRINTSTR "C"; RET
    let main = build_sub(vec![Op::Callasync("child"), Op::Printstr("P"), Op::Ret]);
    let child = build_sub(vec![Op::Wait(0), Op::Printstr("C"), Op::Ret]);
    let image = build_image(vec![("main", main), ("child", child)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "P\nC\n");
}

#[test]
fn difficulty_filter_lunatic_runs_it() {
    let main = build_sub(vec![Op::PrintstrRank("x", 0b1000), Op::Ret]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Lunatic), "x\n");
}

#[test]
fn difficulty_filter_easy_skips_it() {
    let main = build_sub(vec![Op::PrintstrRank("x", 0b1000), Op::Ret]);
    let image = build_image(vec![("main", main)]);
    assert_eq!(run(&image, Difficulty::Easy), "");
}
