mod common;

use std::collections::BTreeSet;

use color_eyre::Result;
use test_log::test;

use clasp_rs::cond;
use clasp_rs::value::Value;

use common::{all_models, boolean, decode, int};

#[test]
fn test_addition_is_exact() -> Result<()> {
    let ctx = common::context(3);
    let a = ctx.int_var();
    let b = ctx.int_var();
    let c = ctx.eval(a + b)?;

    let models = all_models(&ctx.program());
    // Pairs with a + b <= 7
    assert_eq!(models.len(), 36);
    for m in &models {
        let (va, vb, vc) = (int(&ctx, m, a), int(&ctx, m, b), int(&ctx, m, c));
        assert_eq!(va + vb, vc);
        assert!((0..8).contains(&va) && (0..8).contains(&vb));
    }
    Ok(())
}

#[test]
fn test_subtraction_never_goes_negative() -> Result<()> {
    let ctx = common::context(3);
    let a = ctx.int_var();
    let b = ctx.int_var();
    let c = ctx.eval(a - b)?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 36);
    for m in &models {
        assert_eq!(int(&ctx, m, a) - int(&ctx, m, b), int(&ctx, m, c));
    }
    Ok(())
}

#[test]
fn test_multiplication_excludes_overflow() -> Result<()> {
    let ctx = common::context(3);
    let a = ctx.int_var();
    let b = ctx.int_var();
    let c = ctx.eval(a * b)?;

    let models = all_models(&ctx.program());
    let expected = (0..8).flat_map(|x| (0..8).map(move |y| x * y)).filter(|&p| p < 8).count();
    assert_eq!(models.len(), expected);
    for m in &models {
        assert_eq!(int(&ctx, m, a) * int(&ctx, m, b), int(&ctx, m, c));
    }
    Ok(())
}

#[test]
fn test_comparisons() -> Result<()> {
    let ctx = common::context(3);
    let a = ctx.int_var();
    let b = ctx.int_var();
    let checks = [
        (ctx.eval(a.lt(b))?, 0),
        (ctx.eval(a.le(b))?, 1),
        (ctx.eval(a.gt(b))?, 2),
        (ctx.eval(a.ge(b))?, 3),
        (ctx.eval(a.equals(b))?, 4),
        (ctx.eval(a.not_equals(b))?, 5),
    ];

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 64);
    for m in &models {
        let (x, y) = (int(&ctx, m, a), int(&ctx, m, b));
        let expected = [x < y, x <= y, x > y, x >= y, x == y, x != y];
        for &(var, i) in &checks {
            assert_eq!(boolean(&ctx, m, var), expected[i], "check {} for {} and {}", i, x, y);
        }
    }
    Ok(())
}

#[test]
fn test_shifts_and_cond() -> Result<()> {
    let ctx = common::context(4);
    let x = ctx.int_var();
    let p = ctx.bool_var();
    let left = ctx.eval(x << 1)?;
    let right = ctx.eval(x >> 2)?;
    let pick = ctx.eval(cond(p, x, 9))?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 32);
    for m in &models {
        let vx = int(&ctx, m, x);
        assert_eq!(int(&ctx, m, left), (vx << 1) & 0xF);
        assert_eq!(int(&ctx, m, right), vx >> 2);
        let expected = if boolean(&ctx, m, p) { vx } else { 9 };
        assert_eq!(int(&ctx, m, pick), expected);
    }
    Ok(())
}

#[test]
fn test_boolean_operators() -> Result<()> {
    let ctx = common::context(4);
    let a = ctx.bool_var();
    let b = ctx.bool_var();
    let ops = [
        ctx.eval(a & b)?,
        ctx.eval(a | b)?,
        ctx.eval(a ^ b)?,
        ctx.eval(!a)?,
        ctx.eval(a.equals(b))?,
        ctx.eval(a.gt(b))?,
    ];

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 4);
    for m in &models {
        let (x, y) = (boolean(&ctx, m, a), boolean(&ctx, m, b));
        let expected = [x & y, x | y, x ^ y, !x, x == y, x & !y];
        for (var, want) in ops.iter().zip(expected) {
            assert_eq!(boolean(&ctx, m, *var), want);
        }
    }
    Ok(())
}

#[test]
fn test_memoization_keeps_rule_count() -> Result<()> {
    let ctx = common::context(4);
    let a = ctx.int_var();
    let b = ctx.int_var();
    let first = ctx.eval(a + b)?;
    let rules = ctx.program().rules().len();

    let second = ctx.eval(a + b)?;
    let swapped = ctx.eval(b + a)?;
    assert_eq!(first, second);
    assert_eq!(first, swapped);
    assert_eq!(ctx.program().rules().len(), rules);
    Ok(())
}

#[test]
fn test_unproven_atoms_are_false() -> Result<()> {
    let ctx = common::context(4);
    let lonely = ctx.atom();
    let a = ctx.atom();
    let b = ctx.atom();
    let c = ctx.atom();
    // a and b only support each other
    ctx.prove_if(a, b)?;
    ctx.prove_if(b, a)?;
    let x = ctx.bool_var();
    ctx.prove_if(c, x)?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 2);
    for m in &models {
        assert!(!boolean(&ctx, m, lonely));
        assert!(!boolean(&ctx, m, a));
        assert!(!boolean(&ctx, m, b));
        assert_eq!(boolean(&ctx, m, c), boolean(&ctx, m, x));
    }
    Ok(())
}

#[test]
fn test_cyclic_atoms_with_base_case() -> Result<()> {
    let ctx = common::context(4);
    let a = ctx.atom();
    let b = ctx.atom();
    let x = ctx.bool_var();
    ctx.prove_if(a, b)?;
    ctx.prove_if(b, a)?;
    ctx.prove_if(a, x)?;

    for m in &all_models(&ctx.program()) {
        let base = boolean(&ctx, m, x);
        assert_eq!(boolean(&ctx, m, a), base);
        assert_eq!(boolean(&ctx, m, b), base);
    }
    Ok(())
}

#[test]
fn test_multi_exactly_one() -> Result<()> {
    let ctx = common::context(4);
    let m = ctx.multi_var(["a", "b", "c", "d"])?;
    let info = ctx.info(m)?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 4);
    let mut seen = BTreeSet::new();
    for model in &models {
        let true_lits = info.encoding.lits().into_iter().filter(|&l| model.lit_value(l)).count();
        assert_eq!(true_lits, 1);
        seen.insert(decode(&ctx, model, m));
    }
    assert_eq!(seen.len(), 4);
    Ok(())
}

#[test]
fn test_multi_comparison_matches_values() -> Result<()> {
    let ctx = common::context(4);
    let a = ctx.multi_var([1, 2, 3])?;
    let b = ctx.multi_var([2, 3, 4])?;
    let eq = ctx.eval(a.equals(b))?;
    let lt = ctx.eval(a.lt(b))?;
    let ne = ctx.eval(a.not_equals(b))?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 9);
    for m in &models {
        let x = decode(&ctx, m, a);
        let y = decode(&ctx, m, b);
        assert_eq!(boolean(&ctx, m, eq), x == y);
        assert_eq!(boolean(&ctx, m, lt), x < y);
        assert_eq!(boolean(&ctx, m, ne), x != y);
    }
    Ok(())
}

#[test]
fn test_int_range_and_int_in() -> Result<()> {
    let ctx = common::context(4);
    let r = ctx.int_range(3, 6)?;
    let models = all_models(&ctx.program());
    let values: BTreeSet<i64> = models.iter().map(|m| int(&ctx, m, r)).collect();
    assert_eq!(values, BTreeSet::from([3, 4, 5, 6]));

    let ctx = common::context(4);
    let s = ctx.int_in(&[1, 7, 12])?;
    let models = all_models(&ctx.program());
    let values: BTreeSet<i64> = models.iter().map(|m| int(&ctx, m, s)).collect();
    assert_eq!(values, BTreeSet::from([1, 7, 12]));
    Ok(())
}

#[test]
fn test_cardinality() -> Result<()> {
    let ctx = common::context(4);
    let xs: Vec<_> = (0..4).map(|_| ctx.bool_var()).collect();
    let at_least = ctx.at_least(2, &xs)?;
    let at_most = ctx.at_most(1, &xs)?;
    let exactly = ctx.exactly(3, &xs)?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 16);
    for m in &models {
        let count = xs.iter().filter(|&&x| boolean(&ctx, m, x)).count();
        assert_eq!(boolean(&ctx, m, at_least), count >= 2);
        assert_eq!(boolean(&ctx, m, at_most), count <= 1);
        assert_eq!(boolean(&ctx, m, exactly), count == 3);
    }
    Ok(())
}

#[test]
fn test_sum_and_member() -> Result<()> {
    let ctx = common::context(4);
    let xs: Vec<_> = (0..3).map(|_| ctx.bool_var()).collect();
    let total = ctx.sum(&xs)?;
    let y = ctx.int_range(0, 3)?;
    let odd = ctx.member(y, [1, 3])?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 32);
    for m in &models {
        let count = xs.iter().filter(|&&x| boolean(&ctx, m, x)).count() as i64;
        assert_eq!(int(&ctx, m, total), count);
        assert_eq!(boolean(&ctx, m, odd), int(&ctx, m, y) % 2 == 1);
    }
    Ok(())
}

#[test]
fn test_all_different_pairwise() -> Result<()> {
    let ctx = common::context(2);
    let xs: Vec<_> = (0..3).map(|_| ctx.int_var()).collect();
    let diff = ctx.all_different(&xs)?;

    for m in &all_models(&ctx.program()) {
        let values: BTreeSet<i64> = xs.iter().map(|&x| int(&ctx, m, x)).collect();
        assert_eq!(boolean(&ctx, m, diff), values.len() == 3);
    }
    Ok(())
}

#[test]
fn test_multi_division() -> Result<()> {
    let ctx = common::context(4);
    let a = ctx.multi_var([7, 9])?;
    let b = ctx.multi_var([2, 3])?;
    let q = ctx.eval(a / b)?;

    for m in &all_models(&ctx.program()) {
        let x = decode(&ctx, m, a).as_int().unwrap();
        let y = decode(&ctx, m, b).as_int().unwrap();
        assert_eq!(decode(&ctx, m, q), Value::Int(x / y));
    }
    Ok(())
}

#[test]
fn test_multi_cond_follows_predicate() -> Result<()> {
    let ctx = common::context(4);
    let p = ctx.bool_var();
    let a = ctx.multi_var(["x", "y"])?;
    let b = ctx.multi_var(["y", "z"])?;
    let pick = ctx.cond(p, a, b)?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 8);
    for m in &models {
        let expected = if boolean(&ctx, m, p) { decode(&ctx, m, a) } else { decode(&ctx, m, b) };
        assert_eq!(decode(&ctx, m, pick), expected);
    }
    Ok(())
}

#[test]
fn test_at_most_without_bound() -> Result<()> {
    let ctx = common::context(4);
    let xs: Vec<_> = (0..3).map(|_| ctx.bool_var()).collect();
    let any = ctx.at_most(u32::MAX, &xs)?;

    let models = all_models(&ctx.program());
    assert_eq!(models.len(), 8);
    for m in &models {
        assert!(boolean(&ctx, m, any));
    }
    Ok(())
}
