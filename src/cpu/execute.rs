/*!
execute.rs - 6502 instruction semantics (ALU, flags, stack, RMW, branches)

Purpose
=======
One `match` over `Op` applies the side effects of an instruction to the
register file and the bus. Operand bytes have already been consumed by the
addressing resolver; PC points at the next instruction on entry.

Cycle signals
=============
`execute` reports back two things the core needs for timing:
- `accepts_page_penalty`: the op is a read whose indexed access pays +1 cycle
  when the resolver saw a page cross (loads, ALU reads, compares, and the
  absolute,X NOP aliases). Stores and read-modify-write ops always run at
  their fixed table cost.
- `branch_cycles`: +1 for a taken branch, +1 more when the target lies on a
  different page than the instruction that follows the branch.

Accumulator forms
=================
Shifts and rotates act on A when the operand is `Operand::Implied` and on
memory otherwise.
*/

use crate::bus::CpuBus;
use crate::cpu::addressing::{Operand, page_crossed};
use crate::cpu::state::{
    BREAK, CARRY, CpuState, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO,
};
use crate::cpu::table::Op;

/// IRQ / BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Timing feedback from one executed operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Executed {
    pub accepts_page_penalty: bool,
    pub branch_cycles: u8,
}

impl Executed {
    const PLAIN: Executed = Executed {
        accepts_page_penalty: false,
        branch_cycles: 0,
    };
    const READ: Executed = Executed {
        accepts_page_penalty: true,
        branch_cycles: 0,
    };
}

/// Apply `op` to the CPU state and bus.
pub(crate) fn execute<B: CpuBus + ?Sized>(
    op: Op,
    operand: Operand,
    s: &mut CpuState,
    bus: &mut B,
) -> Executed {
    match op {
        // Loads / stores
        Op::Lda => {
            s.a = fetch(s, bus, operand);
            s.update_zn(s.a);
            Executed::READ
        }
        Op::Ldx => {
            s.x = fetch(s, bus, operand);
            s.update_zn(s.x);
            Executed::READ
        }
        Op::Ldy => {
            s.y = fetch(s, bus, operand);
            s.update_zn(s.y);
            Executed::READ
        }
        Op::Sta => {
            bus.write(operand.addr(), s.a);
            Executed::PLAIN
        }
        Op::Stx => {
            bus.write(operand.addr(), s.x);
            Executed::PLAIN
        }
        Op::Sty => {
            bus.write(operand.addr(), s.y);
            Executed::PLAIN
        }

        // Arithmetic / logical
        Op::Adc => {
            let m = fetch(s, bus, operand);
            adc(s, m);
            Executed::READ
        }
        Op::Sbc => {
            // Binary subtract is add of the one's complement.
            let m = fetch(s, bus, operand);
            adc(s, m ^ 0xFF);
            Executed::READ
        }
        Op::And => {
            let m = fetch(s, bus, operand);
            s.a &= m;
            s.update_zn(s.a);
            Executed::READ
        }
        Op::Ora => {
            let m = fetch(s, bus, operand);
            s.a |= m;
            s.update_zn(s.a);
            Executed::READ
        }
        Op::Eor => {
            let m = fetch(s, bus, operand);
            s.a ^= m;
            s.update_zn(s.a);
            Executed::READ
        }
        Op::Bit => {
            let m = fetch(s, bus, operand);
            s.assign_flag(ZERO, (s.a & m) == 0);
            s.assign_flag(NEGATIVE, (m & 0x80) != 0);
            s.assign_flag(OVERFLOW, (m & 0x40) != 0);
            Executed::PLAIN
        }
        Op::Cmp => {
            let m = fetch(s, bus, operand);
            let a = s.a;
            compare(s, a, m);
            Executed::READ
        }
        Op::Cpx => {
            let m = fetch(s, bus, operand);
            let x = s.x;
            compare(s, x, m);
            Executed::PLAIN
        }
        Op::Cpy => {
            let m = fetch(s, bus, operand);
            let y = s.y;
            compare(s, y, m);
            Executed::PLAIN
        }

        // Shifts / rotates
        Op::Asl => {
            modify(s, bus, operand, |s, v| {
                s.assign_flag(CARRY, (v & 0x80) != 0);
                v << 1
            });
            Executed::PLAIN
        }
        Op::Lsr => {
            modify(s, bus, operand, |s, v| {
                s.assign_flag(CARRY, (v & 0x01) != 0);
                v >> 1
            });
            Executed::PLAIN
        }
        Op::Rol => {
            modify(s, bus, operand, |s, v| {
                let carry_in = s.flag_bit(CARRY);
                s.assign_flag(CARRY, (v & 0x80) != 0);
                (v << 1) | carry_in
            });
            Executed::PLAIN
        }
        Op::Ror => {
            modify(s, bus, operand, |s, v| {
                let carry_in = s.flag_bit(CARRY) << 7;
                s.assign_flag(CARRY, (v & 0x01) != 0);
                (v >> 1) | carry_in
            });
            Executed::PLAIN
        }

        // Increments / decrements
        Op::Inc => {
            modify(s, bus, operand, |_, v| v.wrapping_add(1));
            Executed::PLAIN
        }
        Op::Dec => {
            modify(s, bus, operand, |_, v| v.wrapping_sub(1));
            Executed::PLAIN
        }
        Op::Inx => {
            s.x = s.x.wrapping_add(1);
            s.update_zn(s.x);
            Executed::PLAIN
        }
        Op::Iny => {
            s.y = s.y.wrapping_add(1);
            s.update_zn(s.y);
            Executed::PLAIN
        }
        Op::Dex => {
            s.x = s.x.wrapping_sub(1);
            s.update_zn(s.x);
            Executed::PLAIN
        }
        Op::Dey => {
            s.y = s.y.wrapping_sub(1);
            s.update_zn(s.y);
            Executed::PLAIN
        }

        // Branches
        Op::Bcc => branch(s, operand, CARRY, false),
        Op::Bcs => branch(s, operand, CARRY, true),
        Op::Bne => branch(s, operand, ZERO, false),
        Op::Beq => branch(s, operand, ZERO, true),
        Op::Bpl => branch(s, operand, NEGATIVE, false),
        Op::Bmi => branch(s, operand, NEGATIVE, true),
        Op::Bvc => branch(s, operand, OVERFLOW, false),
        Op::Bvs => branch(s, operand, OVERFLOW, true),

        // Jumps / subroutines / interrupts
        Op::Jmp => {
            s.pc = operand.addr();
            Executed::PLAIN
        }
        Op::Jsr => {
            // Return address pushed is the last byte of the JSR itself.
            let ret = s.pc.wrapping_sub(1);
            s.push_u16(bus, ret);
            s.pc = operand.addr();
            Executed::PLAIN
        }
        Op::Rts => {
            s.pc = s.pop_u16(bus).wrapping_add(1);
            Executed::PLAIN
        }
        Op::Rti => {
            let p = s.pop_u8(bus);
            s.status = p & !(BREAK | UNUSED);
            s.pc = s.pop_u16(bus);
            Executed::PLAIN
        }
        Op::Brk => {
            // Immediate mode already stepped PC over the padding byte.
            s.push_u16(bus, s.pc);
            let p = s.status_for_push(true);
            s.push_u8(bus, p);
            s.assign_flag(IRQ_DISABLE, true);
            s.pc = bus.read_word(IRQ_VECTOR);
            Executed::PLAIN
        }

        // Stack
        Op::Pha => {
            s.push_u8(bus, s.a);
            Executed::PLAIN
        }
        Op::Php => {
            let p = s.status_for_push(true);
            s.push_u8(bus, p);
            Executed::PLAIN
        }
        Op::Pla => {
            s.a = s.pop_u8(bus);
            s.update_zn(s.a);
            Executed::PLAIN
        }
        Op::Plp => {
            let p = s.pop_u8(bus);
            s.status = (p | UNUSED) & !BREAK;
            Executed::PLAIN
        }

        // Transfers
        Op::Tax => {
            s.x = s.a;
            s.update_zn(s.x);
            Executed::PLAIN
        }
        Op::Tay => {
            s.y = s.a;
            s.update_zn(s.y);
            Executed::PLAIN
        }
        Op::Txa => {
            s.a = s.x;
            s.update_zn(s.a);
            Executed::PLAIN
        }
        Op::Tya => {
            s.a = s.y;
            s.update_zn(s.a);
            Executed::PLAIN
        }
        Op::Tsx => {
            s.x = s.sp;
            s.update_zn(s.x);
            Executed::PLAIN
        }
        Op::Txs => {
            s.sp = s.x;
            Executed::PLAIN
        }

        // Flags
        Op::Clc => flag(s, CARRY, false),
        Op::Sec => flag(s, CARRY, true),
        Op::Cli => flag(s, IRQ_DISABLE, false),
        Op::Sei => flag(s, IRQ_DISABLE, true),
        Op::Cld => flag(s, DECIMAL, false),
        Op::Sed => flag(s, DECIMAL, true),
        Op::Clv => flag(s, OVERFLOW, false),

        // Aliased NOPs pay the abs,X penalty like a real read.
        Op::Nop => Executed::READ,
        Op::Xxx => Executed::PLAIN,
    }
}

#[inline]
fn fetch<B: CpuBus + ?Sized>(s: &CpuState, bus: &mut B, operand: Operand) -> u8 {
    match operand {
        Operand::Implied => s.a,
        Operand::Address(addr) | Operand::Relative(addr) => bus.read(addr, false),
    }
}

/// Read-modify-write on A (implied) or memory, updating Z/N from the result.
fn modify<B, F>(s: &mut CpuState, bus: &mut B, operand: Operand, f: F)
where
    B: CpuBus + ?Sized,
    F: FnOnce(&mut CpuState, u8) -> u8,
{
    match operand {
        Operand::Implied => {
            let a = s.a;
            let r = f(s, a);
            s.a = r;
            s.update_zn(r);
        }
        Operand::Address(addr) | Operand::Relative(addr) => {
            let v = bus.read(addr, false);
            let r = f(s, v);
            bus.write(addr, r);
            s.update_zn(r);
        }
    }
}

/// Binary add with carry. Decimal mode is not wired on the 2A03.
pub(crate) fn adc(s: &mut CpuState, m: u8) {
    let a = s.a;
    let sum = a as u16 + m as u16 + s.flag_bit(CARRY) as u16;
    let r = sum as u8;
    s.assign_flag(CARRY, sum > 0xFF);
    s.assign_flag(OVERFLOW, ((r ^ a) & (r ^ m) & 0x80) != 0);
    s.a = r;
    s.update_zn(r);
}

fn compare(s: &mut CpuState, reg: u8, m: u8) {
    s.assign_flag(CARRY, reg >= m);
    s.update_zn(reg.wrapping_sub(m));
}

/// Branch when `mask` reads as `when`.
fn branch(s: &mut CpuState, operand: Operand, mask: u8, when: bool) -> Executed {
    if s.is_flag_set(mask) != when {
        return Executed::PLAIN;
    }
    let target = operand.addr();
    let extra = if page_crossed(s.pc, target) { 2 } else { 1 };
    s.pc = target;
    Executed {
        accepts_page_penalty: false,
        branch_cycles: extra,
    }
}

#[inline]
fn flag(s: &mut CpuState, mask: u8, on: bool) -> Executed {
    s.assign_flag(mask, on);
    Executed::PLAIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::PlainBus;

    #[test]
    fn adc_signed_overflow_from_two_positives() {
        let mut s = CpuState::new();
        s.a = 0x50;
        adc(&mut s, 0x50);
        assert_eq!(s.a, 0xA0);
        assert!(!s.is_flag_set(CARRY));
        assert!(s.is_flag_set(OVERFLOW));
        assert!(s.is_flag_set(NEGATIVE));
    }

    #[test]
    fn adc_carry_out_and_zero() {
        let mut s = CpuState::new();
        s.a = 0xFF;
        s.assign_flag(CARRY, true);
        adc(&mut s, 0x00);
        assert_eq!(s.a, 0x00);
        assert!(s.is_flag_set(CARRY));
        assert!(s.is_flag_set(ZERO));
        assert!(!s.is_flag_set(OVERFLOW));
    }

    #[test]
    fn sbc_borrow_semantics() {
        let mut bus = PlainBus::new();
        bus.load(0x0010, &[0x01]);
        let mut s = CpuState::new();
        s.a = 0x00;
        s.assign_flag(CARRY, true);
        execute(Op::Sbc, Operand::Address(0x0010), &mut s, &mut bus);
        assert_eq!(s.a, 0xFF);
        assert!(!s.is_flag_set(CARRY));
        assert!(s.is_flag_set(NEGATIVE));
    }

    #[test]
    fn compare_sets_carry_when_greater_or_equal() {
        let mut bus = PlainBus::new();
        bus.load(0x0010, &[0x40]);
        let mut s = CpuState::new();
        s.a = 0x40;
        execute(Op::Cmp, Operand::Address(0x0010), &mut s, &mut bus);
        assert!(s.is_flag_set(CARRY));
        assert!(s.is_flag_set(ZERO));
        s.a = 0x3F;
        execute(Op::Cmp, Operand::Address(0x0010), &mut s, &mut bus);
        assert!(!s.is_flag_set(CARRY));
        assert!(s.is_flag_set(NEGATIVE));
    }

    #[test]
    fn rotate_accumulator_through_carry() {
        let mut bus = PlainBus::new();
        let mut s = CpuState::new();
        s.a = 0x81;
        s.assign_flag(CARRY, false);
        execute(Op::Ror, Operand::Implied, &mut s, &mut bus);
        assert_eq!(s.a, 0x40);
        assert!(s.is_flag_set(CARRY));
        execute(Op::Rol, Operand::Implied, &mut s, &mut bus);
        assert_eq!(s.a, 0x81);
        assert!(!s.is_flag_set(CARRY));
    }

    #[test]
    fn asl_memory_writes_back() {
        let mut bus = PlainBus::new();
        bus.load(0x0040, &[0xC0]);
        let mut s = CpuState::new();
        execute(Op::Asl, Operand::Address(0x0040), &mut s, &mut bus);
        assert_eq!(bus.peek(0x0040), 0x80);
        assert!(s.is_flag_set(CARRY));
        assert!(s.is_flag_set(NEGATIVE));
        assert_eq!(s.a, 0);
    }

    #[test]
    fn bit_copies_high_bits() {
        let mut bus = PlainBus::new();
        bus.load(0x0040, &[0xC0]);
        let mut s = CpuState::new();
        s.a = 0x01;
        execute(Op::Bit, Operand::Address(0x0040), &mut s, &mut bus);
        assert!(s.is_flag_set(ZERO));
        assert!(s.is_flag_set(NEGATIVE));
        assert!(s.is_flag_set(OVERFLOW));
    }

    #[test]
    fn branch_cycle_costs() {
        let mut s = CpuState::new();
        s.pc = 0x80F0;
        let not_taken = branch(&mut s, Operand::Relative(0x80F8), CARRY, true);
        assert_eq!(not_taken.branch_cycles, 0);
        assert_eq!(s.pc, 0x80F0);

        let same_page = branch(&mut s, Operand::Relative(0x80F8), CARRY, false);
        assert_eq!(same_page.branch_cycles, 1);
        assert_eq!(s.pc, 0x80F8);

        let cross = branch(&mut s, Operand::Relative(0x8102), CARRY, false);
        assert_eq!(cross.branch_cycles, 2);
        assert_eq!(s.pc, 0x8102);
    }

    #[test]
    fn plp_forces_unused_and_clears_break() {
        let mut bus = PlainBus::new();
        let mut s = CpuState::new();
        s.sp = 0xFD;
        s.push_u8(&mut bus, BREAK | CARRY);
        execute(Op::Plp, Operand::Implied, &mut s, &mut bus);
        assert_eq!(s.status, UNUSED | CARRY);
    }

    #[test]
    fn stores_refuse_page_penalty() {
        let mut bus = PlainBus::new();
        let mut s = CpuState::new();
        let sta = execute(Op::Sta, Operand::Address(0x0200), &mut s, &mut bus);
        assert!(!sta.accepts_page_penalty);
        let lda = execute(Op::Lda, Operand::Address(0x0200), &mut s, &mut bus);
        assert!(lda.accepts_page_penalty);
    }
}
