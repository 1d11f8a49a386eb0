//! Opcode and function-code constants for the MIPS32 descriptor table.

/// R-type opcode (funct field selects the operation).
pub const SPECIAL: u32 = 0x00;
/// REGIMM opcode (rt field selects the branch).
pub const REGIMM: u32 = 0x01;
/// SPECIAL2 opcode (`mul`, `madd`, `clz`, ...).
pub const SPECIAL2: u32 = 0x1C;
/// SPECIAL3 opcode (`bitswap` family, CRC).
pub const SPECIAL3: u32 = 0x1F;
/// COP0 opcode.
pub const COP0: u32 = 0x10;
/// COP1 opcode.
pub const COP1: u32 = 0x11;

/// J-type opcodes.
pub mod op {
    /// `j`
    pub const J: u32 = 0x02;
    /// `jal`
    pub const JAL: u32 = 0x03;
    /// `beq`
    pub const BEQ: u32 = 0x04;
    /// `bne`
    pub const BNE: u32 = 0x05;
    /// `blez`
    pub const BLEZ: u32 = 0x06;
    /// `bgtz`
    pub const BGTZ: u32 = 0x07;
    /// `addi`
    pub const ADDI: u32 = 0x08;
    /// `addiu`
    pub const ADDIU: u32 = 0x09;
    /// `slti`
    pub const SLTI: u32 = 0x0A;
    /// `sltiu`
    pub const SLTIU: u32 = 0x0B;
    /// `andi`
    pub const ANDI: u32 = 0x0C;
    /// `ori`
    pub const ORI: u32 = 0x0D;
    /// `xori`
    pub const XORI: u32 = 0x0E;
    /// `lui`
    pub const LUI: u32 = 0x0F;
    /// `lb`
    pub const LB: u32 = 0x20;
    /// `lh`
    pub const LH: u32 = 0x21;
    /// `lw`
    pub const LW: u32 = 0x23;
    /// `lbu`
    pub const LBU: u32 = 0x24;
    /// `lhu`
    pub const LHU: u32 = 0x25;
    /// `sb`
    pub const SB: u32 = 0x28;
    /// `sh`
    pub const SH: u32 = 0x29;
    /// `sw`
    pub const SW: u32 = 0x2B;
    /// `lwc1`
    pub const LWC1: u32 = 0x31;
    /// `ldc1`
    pub const LDC1: u32 = 0x35;
    /// `swc1`
    pub const SWC1: u32 = 0x39;
    /// `sdc1`
    pub const SDC1: u32 = 0x3D;
}

/// SPECIAL funct codes.
pub mod funct {
    /// `sll`
    pub const SLL: u32 = 0x00;
    /// `srl`
    pub const SRL: u32 = 0x02;
    /// `sra`
    pub const SRA: u32 = 0x03;
    /// `sllv`
    pub const SLLV: u32 = 0x04;
    /// `srlv`
    pub const SRLV: u32 = 0x06;
    /// `srav`
    pub const SRAV: u32 = 0x07;
    /// `jr`
    pub const JR: u32 = 0x08;
    /// `jalr`
    pub const JALR: u32 = 0x09;
    /// `syscall`
    pub const SYSCALL: u32 = 0x0C;
    /// `break`
    pub const BREAK: u32 = 0x0D;
    /// `mfhi`
    pub const MFHI: u32 = 0x10;
    /// `mthi`
    pub const MTHI: u32 = 0x11;
    /// `mflo`
    pub const MFLO: u32 = 0x12;
    /// `mtlo`
    pub const MTLO: u32 = 0x13;
    /// `mult`
    pub const MULT: u32 = 0x18;
    /// `multu`
    pub const MULTU: u32 = 0x19;
    /// `div`
    pub const DIV: u32 = 0x1A;
    /// `divu`
    pub const DIVU: u32 = 0x1B;
    /// `add`
    pub const ADD: u32 = 0x20;
    /// `addu`
    pub const ADDU: u32 = 0x21;
    /// `sub`
    pub const SUB: u32 = 0x22;
    /// `subu`
    pub const SUBU: u32 = 0x23;
    /// `and`
    pub const AND: u32 = 0x24;
    /// `or`
    pub const OR: u32 = 0x25;
    /// `xor`
    pub const XOR: u32 = 0x26;
    /// `nor`
    pub const NOR: u32 = 0x27;
    /// `slt`
    pub const SLT: u32 = 0x2A;
    /// `sltu`
    pub const SLTU: u32 = 0x2B;
    /// `tge`
    pub const TGE: u32 = 0x30;
    /// `tgeu`
    pub const TGEU: u32 = 0x31;
    /// `tlt`
    pub const TLT: u32 = 0x32;
    /// `tltu`
    pub const TLTU: u32 = 0x33;
    /// `teq`
    pub const TEQ: u32 = 0x34;
    /// `tne`
    pub const TNE: u32 = 0x36;
}

/// REGIMM rt codes.
pub mod regimm {
    /// `bltz`
    pub const BLTZ: u8 = 0x00;
    /// `bgez`
    pub const BGEZ: u8 = 0x01;
    /// `bltzal`
    pub const BLTZAL: u8 = 0x10;
    /// `bgezal`
    pub const BGEZAL: u8 = 0x11;
}

/// SPECIAL2 funct codes.
pub mod special2 {
    /// `madd`
    pub const MADD: u32 = 0x00;
    /// `maddu`
    pub const MADDU: u32 = 0x01;
    /// `mul`
    pub const MUL: u32 = 0x02;
    /// `msub`
    pub const MSUB: u32 = 0x04;
    /// `msubu`
    pub const MSUBU: u32 = 0x05;
    /// `clz`
    pub const CLZ: u32 = 0x20;
    /// `clo`
    pub const CLO: u32 = 0x21;
}

/// SPECIAL3 funct codes and BSHFL sub-ops.
pub mod special3 {
    /// CRC32 funct.
    pub const CRC: u32 = 0x0F;
    /// BSHFL funct (`bitswap`, `wsbh`, `seb`, `seh` by `sa`).
    pub const BSHFL: u32 = 0x20;
    /// `bitswap` sa code.
    pub const SA_BITSWAP: u8 = 0x00;
    /// `wsbh` sa code.
    pub const SA_WSBH: u8 = 0x02;
    /// `seb` sa code.
    pub const SA_SEB: u8 = 0x10;
    /// `seh` sa code.
    pub const SA_SEH: u8 = 0x18;
    /// CRC sz code: byte.
    pub const SZ_BYTE: u8 = 0x00;
    /// CRC sz code: half.
    pub const SZ_HALF: u8 = 0x01;
    /// CRC sz code: word.
    pub const SZ_WORD: u8 = 0x02;
    /// CRC "Castagnoli polynomial" flag bit within sa.
    pub const C_FLAG: u8 = 0x04;
}

/// Coprocessor rs-field sub-ops.
pub mod cop {
    /// `mfc*`
    pub const MF: u8 = 0x00;
    /// `mtc*`
    pub const MT: u8 = 0x04;
    /// COP1 branch (`bc1f`/`bc1t` by rt bit 0).
    pub const BC: u8 = 0x08;
    /// Single-precision format.
    pub const FMT_S: u8 = 0x10;
    /// Double-precision format.
    pub const FMT_D: u8 = 0x11;
    /// Word format.
    pub const FMT_W: u8 = 0x14;
}

/// COP1 funct codes.
pub mod cop1 {
    /// `add.fmt`
    pub const ADD: u32 = 0x00;
    /// `sub.fmt`
    pub const SUB: u32 = 0x01;
    /// `mul.fmt`
    pub const MUL: u32 = 0x02;
    /// `div.fmt`
    pub const DIV: u32 = 0x03;
    /// `sqrt.fmt`
    pub const SQRT: u32 = 0x04;
    /// `abs.fmt`
    pub const ABS: u32 = 0x05;
    /// `mov.fmt`
    pub const MOV: u32 = 0x06;
    /// `neg.fmt`
    pub const NEG: u32 = 0x07;
    /// `class.fmt`
    pub const CLASS: u32 = 0x1B;
    /// `cvt.s.fmt`
    pub const CVT_S: u32 = 0x20;
    /// `cvt.d.fmt`
    pub const CVT_D: u32 = 0x21;
    /// `cvt.w.fmt`
    pub const CVT_W: u32 = 0x24;
    /// `c.eq.fmt`
    pub const C_EQ: u32 = 0x32;
    /// `c.lt.fmt`
    pub const C_LT: u32 = 0x3C;
    /// `c.le.fmt`
    pub const C_LE: u32 = 0x3E;
}

/// Reflected polynomial for the `crc32*` family.
pub const CRC32_POLY: u32 = 0xEDB8_8320;
/// Reflected polynomial for the `crc32c*` family.
pub const CRC32C_POLY: u32 = 0x82F6_3B78;
