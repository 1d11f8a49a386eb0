//! COP1 floating-point descriptors.
//!
//! Single- and double-precision variants share helpers; the double forms
//! use the even-register operand type so evenness is enforced at encode
//! time, with the flights re-checking at run time.

use crate::arch::RegRef;
use crate::exec::flights::alu::UnReg;
use crate::exec::flights::branch::BranchFpCond;
use crate::exec::flights::fp::{
    FpArith, FpBin, FpClass, FpCmp, FpConvert, FpCvt, FpPred, FpUn, FpUnary,
};
use crate::isa::descriptor::{ArchMap, InstructionDescriptor, InstructionSet};
use crate::isa::fields::{i_type, r_type, InstructionBits, MATCH_OP_RS};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::codes::{cop, cop1, COP1};
use crate::isa::table::{basic, ctor, RT_FIELD, SHAMT_FIELD};

fn fmt_of(double: bool) -> u8 {
    if double { cop::FMT_D } else { cop::FMT_S }
}

fn freg_type(double: bool) -> T {
    if double { T::EvenFloatRegister } else { T::FloatRegister }
}

fn fpr_operand(cx: &crate::isa::descriptor::EncodeCtx<'_>, idx: usize, double: bool)
    -> Result<u8, crate::common::error::AssemblerErrorKind>
{
    if double { cx.even_fpr(idx) } else { cx.fpr(idx) }
}

/// `mn $fd, $fs, $ft` — three-operand FP arithmetic.
fn fp3(mn: &'static str, double: bool, op: FpArith) -> InstructionDescriptor {
    let fmt = fmt_of(double);
    let f = match op {
        FpArith::Add => cop1::ADD,
        FpArith::Sub => cop1::SUB,
        FpArith::Mul => cop1::MUL,
        FpArith::Div => cop1::DIV,
    };
    basic(
        mn,
        vec![freg_type(double); 3],
        MATCH_OP_RS | 0x3F,
        r_type(COP1, fmt, 0, 0, 0, f),
        Box::new(move |cx| {
            Ok(r_type(
                COP1,
                fmt,
                fpr_operand(cx, 2, double)?,
                fpr_operand(cx, 1, double)?,
                fpr_operand(cx, 0, double)?,
                f,
            ))
        }),
        Box::new(|w| {
            vec![
                Operand::Fpr(w.shamt()),
                Operand::Fpr(w.rd()),
                Operand::Fpr(w.rt()),
            ]
        }),
        ArchMap::all(ctor(move |w| {
            Box::new(FpBin::new(w.shamt(), w.rd(), w.rt(), double, op))
        })),
    )
}

/// `mn $fd, $fs` — unary FP transform, ft zero.
fn fp2(mn: &'static str, double: bool, op: FpUnary) -> InstructionDescriptor {
    let fmt = fmt_of(double);
    let f = match op {
        FpUnary::Abs => cop1::ABS,
        FpUnary::Neg => cop1::NEG,
        FpUnary::Mov => cop1::MOV,
        FpUnary::Sqrt => cop1::SQRT,
    };
    basic(
        mn,
        vec![freg_type(double); 2],
        MATCH_OP_RS | RT_FIELD | 0x3F,
        r_type(COP1, fmt, 0, 0, 0, f),
        Box::new(move |cx| {
            Ok(r_type(
                COP1,
                fmt,
                0,
                fpr_operand(cx, 1, double)?,
                fpr_operand(cx, 0, double)?,
                f,
            ))
        }),
        Box::new(|w| vec![Operand::Fpr(w.shamt()), Operand::Fpr(w.rd())]),
        ArchMap::all(ctor(move |w| {
            Box::new(FpUn::new(w.shamt(), w.rd(), double, op))
        })),
    )
}

/// `mn $fs, $ft` — FP compare writing the condition flag, fd zero.
fn fp_cmp(mn: &'static str, double: bool, pred: FpPred) -> InstructionDescriptor {
    let fmt = fmt_of(double);
    let f = match pred {
        FpPred::Eq => cop1::C_EQ,
        FpPred::Lt => cop1::C_LT,
        FpPred::Le => cop1::C_LE,
    };
    basic(
        mn,
        vec![freg_type(double); 2],
        MATCH_OP_RS | SHAMT_FIELD | 0x3F,
        r_type(COP1, fmt, 0, 0, 0, f),
        Box::new(move |cx| {
            Ok(r_type(
                COP1,
                fmt,
                fpr_operand(cx, 1, double)?,
                fpr_operand(cx, 0, double)?,
                0,
                f,
            ))
        }),
        Box::new(|w| vec![Operand::Fpr(w.rd()), Operand::Fpr(w.rt())]),
        ArchMap::all(ctor(move |w| {
            Box::new(FpCmp::new(w.rd(), w.rt(), double, pred))
        })),
    )
}

/// `cvt.x.y $fd, $fs`.
fn cvt(mn: &'static str, f: u32, fmt: u8, kind: FpCvt, dst: T, src: T) -> InstructionDescriptor {
    basic(
        mn,
        vec![dst, src],
        MATCH_OP_RS | RT_FIELD | 0x3F,
        r_type(COP1, fmt, 0, 0, 0, f),
        Box::new(move |cx| {
            let fd = if dst == T::EvenFloatRegister { cx.even_fpr(0)? } else { cx.fpr(0)? };
            let fs = if src == T::EvenFloatRegister { cx.even_fpr(1)? } else { cx.fpr(1)? };
            Ok(r_type(COP1, fmt, 0, fs, fd, f))
        }),
        Box::new(|w| vec![Operand::Fpr(w.shamt()), Operand::Fpr(w.rd())]),
        ArchMap::all(ctor(move |w| {
            Box::new(FpConvert::new(w.shamt(), w.rd(), kind))
        })),
    )
}

/// `class.fmt $fd, $fs` — ft zero, result mask in fd.
fn fp_class(mn: &'static str, double: bool) -> InstructionDescriptor {
    let fmt = fmt_of(double);
    basic(
        mn,
        vec![freg_type(double); 2],
        MATCH_OP_RS | RT_FIELD | 0x3F,
        r_type(COP1, fmt, 0, 0, 0, cop1::CLASS),
        Box::new(move |cx| {
            Ok(r_type(
                COP1,
                fmt,
                0,
                fpr_operand(cx, 1, double)?,
                fpr_operand(cx, 0, double)?,
                cop1::CLASS,
            ))
        }),
        Box::new(|w| vec![Operand::Fpr(w.shamt()), Operand::Fpr(w.rd())]),
        ArchMap::all(ctor(move |w| {
            Box::new(FpClass::new(w.shamt(), w.rd(), double))
        })),
    )
}

pub(super) fn register(set: &mut InstructionSet) {
    set.register(fp3("add.s", false, FpArith::Add));
    set.register(fp3("sub.s", false, FpArith::Sub));
    set.register(fp3("mul.s", false, FpArith::Mul));
    set.register(fp3("div.s", false, FpArith::Div));
    set.register(fp2("abs.s", false, FpUnary::Abs));
    set.register(fp2("neg.s", false, FpUnary::Neg));
    set.register(fp2("mov.s", false, FpUnary::Mov));
    set.register(fp2("sqrt.s", false, FpUnary::Sqrt));
    set.register(fp_cmp("c.eq.s", false, FpPred::Eq));
    set.register(fp_cmp("c.lt.s", false, FpPred::Lt));
    set.register(fp_cmp("c.le.s", false, FpPred::Le));
    set.register(fp_class("class.s", false));

    set.register(fp3("add.d", true, FpArith::Add));
    set.register(fp3("sub.d", true, FpArith::Sub));
    set.register(fp3("mul.d", true, FpArith::Mul));
    set.register(fp3("div.d", true, FpArith::Div));
    set.register(fp2("abs.d", true, FpUnary::Abs));
    set.register(fp2("neg.d", true, FpUnary::Neg));
    set.register(fp2("mov.d", true, FpUnary::Mov));
    set.register(fp2("sqrt.d", true, FpUnary::Sqrt));
    set.register(fp_cmp("c.eq.d", true, FpPred::Eq));
    set.register(fp_cmp("c.lt.d", true, FpPred::Lt));
    set.register(fp_cmp("c.le.d", true, FpPred::Le));
    set.register(fp_class("class.d", true));

    set.register(cvt(
        "cvt.d.s",
        cop1::CVT_D,
        cop::FMT_S,
        FpCvt::SingleToDouble,
        T::EvenFloatRegister,
        T::FloatRegister,
    ));
    set.register(cvt(
        "cvt.s.d",
        cop1::CVT_S,
        cop::FMT_D,
        FpCvt::DoubleToSingle,
        T::FloatRegister,
        T::EvenFloatRegister,
    ));
    set.register(cvt(
        "cvt.s.w",
        cop1::CVT_S,
        cop::FMT_W,
        FpCvt::WordToSingle,
        T::FloatRegister,
        T::FloatRegister,
    ));
    set.register(cvt(
        "cvt.w.s",
        cop1::CVT_W,
        cop::FMT_S,
        FpCvt::SingleToWord,
        T::FloatRegister,
        T::FloatRegister,
    ));
    set.register(cvt(
        "cvt.d.w",
        cop1::CVT_D,
        cop::FMT_W,
        FpCvt::WordToDouble,
        T::EvenFloatRegister,
        T::FloatRegister,
    ));
    set.register(cvt(
        "cvt.w.d",
        cop1::CVT_W,
        cop::FMT_D,
        FpCvt::DoubleToWord,
        T::FloatRegister,
        T::EvenFloatRegister,
    ));

    // mfc1 $rt, $fs / mtc1 $rt, $fs — word moves between files.
    set.register(basic(
        "mfc1",
        vec![T::Register, T::FloatRegister],
        MATCH_OP_RS | SHAMT_FIELD | 0x3F,
        r_type(COP1, cop::MF, 0, 0, 0, 0),
        Box::new(|cx| Ok(r_type(COP1, cop::MF, cx.reg(0)?, cx.fpr(1)?, 0, 0))),
        Box::new(|w| vec![Operand::Reg(w.rt()), Operand::Fpr(w.rd())]),
        ArchMap::all(ctor(|w| {
            Box::new(UnReg::new(RegRef::Gpr(w.rt()), RegRef::Fpr(w.rd()), |v| v))
        })),
    ));
    set.register(basic(
        "mtc1",
        vec![T::Register, T::FloatRegister],
        MATCH_OP_RS | SHAMT_FIELD | 0x3F,
        r_type(COP1, cop::MT, 0, 0, 0, 0),
        Box::new(|cx| Ok(r_type(COP1, cop::MT, cx.reg(0)?, cx.fpr(1)?, 0, 0))),
        Box::new(|w| vec![Operand::Reg(w.rt()), Operand::Fpr(w.rd())]),
        ArchMap::all(ctor(|w| {
            Box::new(UnReg::new(RegRef::Fpr(w.rd()), RegRef::Gpr(w.rt()), |v| v))
        })),
    ));

    // bc1f label / bc1t label — branch on the FP condition flag.
    for (mn, want, rt_code) in [("bc1f", false, 0u8), ("bc1t", true, 1u8)] {
        set.register(basic(
            mn,
            vec![T::Label],
            MATCH_OP_RS | RT_FIELD,
            i_type(COP1, cop::BC, rt_code, 0),
            Box::new(move |cx| Ok(i_type(COP1, cop::BC, rt_code, cx.branch_offset(0)?))),
            Box::new(|w| vec![Operand::Imm(i64::from(w.imm16()))]),
            ArchMap::all(ctor(move |w| {
                Box::new(BranchFpCond::new(want, w.imm16()))
            })),
        ));
    }
}
