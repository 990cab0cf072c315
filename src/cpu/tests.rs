// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Unit tests for [super::CPU]
//!
//! These run instructions, and ensure their output is consistent with previous builds
//!
//! General test format:
//! 1. Prepare to do the thing
//! 2. Do the thing
//! 3. Compare the result to the expected result

use super::*;
use crate::screen::{HEIGHT, WIDTH};
use rand::random;


fn setup_environment() -> CPU {
    let mut cpu = CPU::default();
    cpu.load_program(&[0x12, 0x00]) // jmp 200
        .unwrap();
    cpu
}

/// Writes one instruction word at the pc
fn put_word(cpu: &mut CPU, word: u16) {
    let [hi, lo] = word.to_be_bytes();
    let pc = cpu.pc as usize;
    cpu.mem.write(pc, hi).unwrap();
    cpu.mem.write(pc + 1, lo).unwrap();
}

/// Writes one instruction word at the pc and runs it
fn run_word(cpu: &mut CPU, word: u16) -> Result<()> {
    put_word(cpu, word);
    cpu.cycle().map(|_| ())
}

/// Unused instructions
mod unimplemented {
    use super::*;
    fn assert_skipped(word: u16) {
        let mut cpu = setup_environment();
        let before = cpu.clone();
        match run_word(&mut cpu, word) {
            Err(Error::UnknownOpcode { word: w, addr }) => {
                assert_eq!(word, w);
                assert_eq!(0x200, addr);
            }
            other => panic!("{word:04x} should be unknown, got {other:?}"),
        }
        // only the pc and cycle count move
        assert_eq!(0x202, cpu.pc);
        assert_eq!(before.v, cpu.v);
        assert_eq!(before.i, cpu.i);
        assert_eq!(before.stack, cpu.stack);
    }
    #[test]
    fn ins_0nnn() {
        assert_skipped(0x0420);
    }
    #[test]
    fn ins_5xyn() {
        assert_skipped(0x500f);
    }
    #[test]
    fn ins_8xyn() {
        assert_skipped(0x800f);
    }
    #[test]
    fn ins_9xyn() {
        assert_skipped(0x900f);
    }
    #[test]
    fn ins_exbb() {
        assert_skipped(0xe00f);
    }
    #[test]
    fn ins_fxbb() {
        assert_skipped(0xf00f);
    }
}

mod sys {
    use super::*;
    /// 00e0: Clears the screen memory to 0
    #[test]
    fn clear_screen() {
        let mut cpu = setup_environment();
        for _ in 0..0x100 {
            cpu.screen.toggle(random(), random(), true);
        }
        cpu.clear_screen();
        assert!(cpu.screen.pixels().iter().all(|&p| !p));
    }

    /// 00ee: Returns from subroutine
    #[test]
    fn ret() {
        let test_addr = random::<u16>() & 0x7ff;
        let mut cpu = setup_environment();
        // Place the address on the stack
        cpu.stack.push(test_addr);

        cpu.ret().unwrap();

        // Verify the current address is the address from the stack
        assert_eq!(test_addr, cpu.pc);
        assert!(cpu.stack.is_empty());
    }

    /// 00ee: Returning with nothing on the stack is an error, and changes nothing
    #[test]
    fn ret_underflow() {
        let mut cpu = setup_environment();
        put_word(&mut cpu, 0x00ee);
        let before = cpu.clone();
        match cpu.cycle() {
            Err(Error::StackUnderflow { addr }) => assert_eq!(0x200, addr),
            other => panic!("expected StackUnderflow, got {other:?}"),
        }
        assert_eq!(before, cpu);
    }
}

/// Tests control-flow instructions
///
/// Basically anything that touches the program counter
mod cf {
    use super::*;
    /// 1aaa: Sets the program counter to an absolute address
    #[test]
    fn jump() {
        let mut cpu = setup_environment();
        // Test all valid addresses
        for addr in 0x000..0xffe {
            // Jump to an address
            cpu.jump(addr);
            // Verify the current address is the jump target address
            assert_eq!(addr, cpu.pc);
        }
    }

    /// 2aaa: Pushes pc onto the stack, then jumps to a
    #[test]
    fn call() {
        let test_addr = random::<u16>() & 0xfff;
        let mut cpu = setup_environment();
        // Save the current address
        let curr_addr = cpu.pc;
        // Call an address
        cpu.call(test_addr).unwrap();
        // Verify the current address is the called address
        assert_eq!(test_addr, cpu.pc);
        // Verify the previous address was stored on the stack
        let stack_addr: u16 = cpu.stack.pop().expect("This should return curr_addr");
        assert_eq!(stack_addr, curr_addr);
    }

    /// 2aaa: Calls nest sixteen deep, and no deeper
    #[test]
    fn call_overflow() {
        let mut cpu = setup_environment();
        // each call lands on another call to itself
        for depth in 1..=STACK_DEPTH {
            run_word(&mut cpu, 0x2200).unwrap();
            assert_eq!(depth, cpu.sp());
        }
        let before = cpu.clone();
        match run_word(&mut cpu, 0x2200) {
            Err(Error::StackOverflow { addr }) => assert_eq!(0x200, addr),
            other => panic!("expected StackOverflow, got {other:?}"),
        }
        assert_eq!(before, cpu);
    }

    /// 2aaa then 00ee: lands just past the call
    #[test]
    fn call_then_return() {
        let mut cpu = setup_environment();
        cpu.pc = 0x300;
        run_word(&mut cpu, 0x2400).unwrap();
        assert_eq!(0x400, cpu.pc);
        run_word(&mut cpu, 0x00ee).unwrap();
        assert_eq!(0x302, cpu.pc);
        assert_eq!(0, cpu.sp());
    }

    /// 3xbb: Skips the next instruction if register X == b
    #[test]
    fn skip_equals_immediate() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff {
            let (a, b, addr) = (word as u8, (word >> 4) as u8, random::<u16>() & 0x7fe);
            for x in 0..=0xf {
                // set the PC to a random address
                cpu.pc = addr;

                cpu.v[x] = a;

                cpu.skip_equals_immediate(x, b);

                assert_eq!(cpu.pc, addr.wrapping_add(if a == b { 2 } else { 0 }));
            }
        }
    }

    /// 4xbb: Skips the next instruction if register X != b
    #[test]
    fn skip_not_equals_immediate() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff {
            let (a, b, addr) = (word as u8, (word >> 4) as u8, random::<u16>() & 0x7fe);
            for x in 0..=0xf {
                cpu.pc = addr;
                cpu.v[x] = a;

                cpu.skip_not_equals_immediate(x, b);

                assert_eq!(cpu.pc, addr.wrapping_add(if a != b { 2 } else { 0 }));
            }
        }
    }

    /// 5xy0: Skips the next instruction if register X == register Y
    #[test]
    fn skip_equals() {
        let mut cpu = setup_environment();
        for word in 0..=0xff {
            let (a, b, addr) = (word as u8, (word >> 4) as u8, random::<u16>() & 0x7fe);
            for reg in 0..=0xff {
                let (x, y) = (reg & 0xf, reg >> 4);
                if x == y {
                    continue;
                }
                cpu.pc = addr;
                cpu.v[x] = a;
                cpu.v[y] = b;

                cpu.skip_equals(x, y);

                assert_eq!(cpu.pc, addr.wrapping_add(if a == b { 2 } else { 0 }));
            }
        }
    }

    /// 9xy0: Skips the next instruction if register X != register Y
    #[test]
    fn skip_not_equals() {
        let mut cpu = setup_environment();
        for word in 0..=0xff {
            let (a, b, addr) = (word as u8, (word >> 4) as u8, random::<u16>() & 0x7fe);
            for reg in 0..=0xff {
                let (x, y) = (reg & 0xf, reg >> 4);
                if x == y {
                    continue;
                }
                cpu.pc = addr;
                cpu.v[x] = a;
                cpu.v[y] = b;

                cpu.skip_not_equals(x, y);

                assert_eq!(cpu.pc, addr.wrapping_add(if a != b { 2 } else { 0 }));
            }
        }
    }

    /// Through the whole cycle, skips move the pc by 4 and non-skips by 2
    #[test]
    fn skip_cycle_distance() {
        let cases: [(u16, bool); 6] = [
            (0x3105, true),  // v1 == 5
            (0x3106, false), // v1 == 6
            (0x4106, true),  // v1 != 6
            (0x4105, false), // v1 != 5
            (0x5120, true),  // v1 == v2
            (0x5130, false), // v1 == v3
        ];
        for (word, skips) in cases {
            let mut cpu = setup_environment();
            cpu.v[1] = 5;
            cpu.v[2] = 5;
            cpu.v[3] = 6;
            run_word(&mut cpu, word).unwrap();
            assert_eq!(if skips { 0x204 } else { 0x202 }, cpu.pc, "{word:04x}");
        }
    }

    /// Baaa: Jumps to the address plus v0
    #[test]
    fn jump_indexed() {
        let mut cpu = setup_environment();
        for _ in 0..0x100 {
            let (v0, a) = (random::<u8>(), random::<u16>() & 0xfff);
            cpu.v[0] = v0;
            cpu.jump_indexed(a);
            assert_eq!((a + v0 as u16) & 0xfff, cpu.pc);
        }
    }

    /// Baaa: With the quirk on, jumps to the address plus vX
    #[test]
    fn jump_indexed_quirk() {
        let mut cpu = setup_environment();
        cpu.flags.quirks.jump_vx = true;
        cpu.v[0] = 0xff;
        cpu.v[3] = 0x10;
        cpu.jump_indexed(0x345);
        assert_eq!(0x355, cpu.pc);
    }
}

mod math {
    use super::*;
    /// 6xbb: Loads immediate byte b into register vX
    #[test]
    fn load_immediate() {
        let mut cpu = setup_environment();
        for test_register in 0x0..=0xf {
            for test_byte in 0x0..=0xff {
                cpu.load_immediate(test_register, test_byte);
                assert_eq!(cpu.v[test_register], test_byte)
            }
        }
    }

    /// 7xbb: Adds immediate byte b to register vX, without touching vF
    #[test]
    fn add_immediate() {
        let mut cpu = setup_environment();
        for x in 0..0xf {
            for byte in 0..=0xff {
                let value = random::<u8>();
                cpu.v[x] = value;
                cpu.v[0xf] = 0xa5;
                cpu.add_immediate(x, byte);
                assert_eq!(value.wrapping_add(byte), cpu.v[x]);
                assert_eq!(0xa5, cpu.v[0xf]);
            }
        }
    }

    /// 7xbb: 0xff + 1 wraps to 0
    #[test]
    fn add_immediate_wraps() {
        let mut cpu = setup_environment();
        cpu.v[4] = 0xff;
        run_word(&mut cpu, 0x7401).unwrap();
        assert_eq!(0, cpu.v[4]);
    }

    /// 8xy0: Loads the value of y into x
    #[test]
    fn load() {
        let mut cpu = setup_environment();
        for x in 0..=0xf {
            for y in 0..=0xf {
                let byte = random::<u8>();
                cpu.v[y] = byte;
                cpu.load(x, y);
                assert_eq!(cpu.v[x], byte);
            }
        }
    }

    /// 8xy1: Performs bitwise or of vX and vY, and stores the result in vX
    #[test]
    fn or() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff_u16 {
            let (a, b) = ((word >> 8) as u8, word as u8);
            cpu.v[1] = a;
            cpu.v[2] = b;
            cpu.v[0xf] = 0xff;
            cpu.or(1, 2);
            assert_eq!(a | b, cpu.v[1]);
            // vF is reset by default
            assert_eq!(0, cpu.v[0xf]);
        }
    }

    /// 8xy2: Performs bitwise and of vX and vY, and stores the result in vX
    #[test]
    fn and() {
        let mut cpu = setup_environment();
        cpu.flags.quirks.bin_ops = true;
        for word in 0..=0xffff_u16 {
            let (a, b) = ((word >> 8) as u8, word as u8);
            cpu.v[1] = a;
            cpu.v[2] = b;
            cpu.v[0xf] = 0xff;
            cpu.and(1, 2);
            assert_eq!(a & b, cpu.v[1]);
            // vF left alone with the quirk
            assert_eq!(0xff, cpu.v[0xf]);
        }
    }

    /// 8xy3: Performs bitwise xor of vX and vY, and stores the result in vX
    #[test]
    fn xor() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff_u16 {
            let (a, b) = ((word >> 8) as u8, word as u8);
            cpu.v[1] = a;
            cpu.v[2] = b;
            cpu.xor(1, 2);
            assert_eq!(a ^ b, cpu.v[1]);
        }
    }

    /// 8xy4: Performs addition of vX and vY, and stores the result in vX, carry in vF
    #[test]
    fn add() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff_u16 {
            let (a, b) = ((word >> 8) as u8, word as u8);
            let (expected, carry) = a.overflowing_add(b);
            cpu.v[1] = a;
            cpu.v[2] = b;
            cpu.add(1, 2);
            assert_eq!(expected, cpu.v[1]);
            assert_eq!(carry as u8, cpu.v[0xf]);
        }
    }

    /// 8xy5: Performs subtraction of vX and vY, and stores the result in vX, !borrow in vF
    #[test]
    fn sub() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff_u16 {
            let (a, b) = ((word >> 8) as u8, word as u8);
            cpu.v[1] = a;
            cpu.v[2] = b;
            cpu.sub(1, 2);
            assert_eq!(a.wrapping_sub(b), cpu.v[1]);
            assert_eq!((a >= b) as u8, cpu.v[0xf]);
        }
    }

    /// 8xy7: Performs subtraction of vY and vX, and stores the result in vX, !borrow in vF
    #[test]
    fn backwards_sub() {
        let mut cpu = setup_environment();
        for word in 0..=0xffff_u16 {
            let (a, b) = ((word >> 8) as u8, word as u8);
            cpu.v[1] = a;
            cpu.v[2] = b;
            cpu.backwards_sub(1, 2);
            assert_eq!(b.wrapping_sub(a), cpu.v[1]);
            assert_eq!((b >= a) as u8, cpu.v[0xf]);
        }
    }

    /// 8xy6: Shifts vY right into vX, shifted-out bit in vF
    #[test]
    fn shift_right() {
        let mut cpu = setup_environment();
        for byte in 0..=0xff_u8 {
            cpu.v[1] = 0;
            cpu.v[2] = byte;
            cpu.shift_right(1, 2);
            assert_eq!(byte >> 1, cpu.v[1]);
            assert_eq!(byte & 1, cpu.v[0xf]);
        }
    }

    /// 8xy6: With the quirk on, shifts vX in place
    #[test]
    fn shift_right_quirk() {
        let mut cpu = setup_environment();
        cpu.flags.quirks.shift = true;
        cpu.v[1] = 0b11;
        cpu.v[2] = 0xf0;
        cpu.shift_right(1, 2);
        assert_eq!(0b1, cpu.v[1]);
        assert_eq!(1, cpu.v[0xf]);
    }

    /// 8xyE: Shifts vY left into vX, shifted-out bit in vF
    #[test]
    fn shift_left() {
        let mut cpu = setup_environment();
        for byte in 0..=0xff_u8 {
            cpu.v[1] = 0;
            cpu.v[2] = byte;
            cpu.shift_left(1, 2);
            assert_eq!(byte << 1, cpu.v[1]);
            assert_eq!(byte >> 7, cpu.v[0xf]);
        }
    }

    /// 8xy4 with x = F: the flag wins over the sum
    #[test]
    fn add_into_vf() {
        let mut cpu = setup_environment();
        cpu.v[0xf] = 0x80;
        cpu.v[1] = 0x80;
        cpu.add(0xf, 1);
        assert_eq!(1, cpu.v[0xf]);
    }
}

mod i {
    use super::*;
    /// Aadr: Load address #adr into register I
    #[test]
    fn load_i_immediate() {
        let mut cpu = setup_environment();
        for addr in 0..0x1000 {
            cpu.load_i_immediate(addr);
            assert_eq!(addr, cpu.i);
        }
    }

    /// Fx1e: Add vX to I, wrapping within 12 bits
    #[test]
    fn add_i() {
        let mut cpu = setup_environment();
        for _ in 0..0x1000 {
            let (i, v) = (random::<u16>() & 0xfff, random::<u8>());
            cpu.i = i;
            cpu.v[5] = v;
            cpu.add_i(5);
            assert_eq!((i + v as u16) & 0xfff, cpu.i);
        }
    }

    /// Fx29: Load sprite for character x into I
    #[test]
    fn load_sprite() {
        let mut cpu = setup_environment();
        for digit in 0..=0xff_u8 {
            cpu.v[0] = digit;
            cpu.load_sprite(0);
            assert_eq!(0x50 + 5 * (digit as u16 & 0xf), cpu.i);
        }
    }
}

mod random_byte {
    use super::*;
    /// Cxbb: Stores a random number & the provided byte into vX
    #[test]
    fn rand() {
        let mut cpu = setup_environment();
        for mask in 0..=0xff {
            cpu.rand(0, mask);
            assert_eq!(0, cpu.v[0] & !mask);
        }
        cpu.v[0] = 0xff;
        cpu.rand(0, 0);
        assert_eq!(0, cpu.v[0]);
    }
}

mod draw {
    use super::*;

    fn draw_glyph(cpu: &mut CPU, digit: u8, x: u8, y: u8) {
        cpu.v[0] = digit;
        cpu.v[1] = x;
        cpu.v[2] = y;
        cpu.load_sprite(0);
        cpu.draw(1, 2, 5).unwrap();
    }

    /// Dxyn: Draws the font glyph where it was asked to
    #[test]
    fn draw_glyph_zero() {
        let mut cpu = setup_environment();
        draw_glyph(&mut cpu, 0, 10, 4);
        assert_eq!(0, cpu.v[0xf]);
        // 0xf0, 0x90, 0x90, 0x90, 0xf0
        for row in 0..5 {
            for col in 0..8 {
                let expected = match (row, col) {
                    (0 | 4, 0..=3) => true,
                    (_, 0 | 3) => true,
                    _ => false,
                };
                assert_eq!(expected, cpu.screen.get(10 + col, 4 + row), "({col}, {row})");
            }
        }
        assert_eq!(14, cpu.screen.lit());
    }

    /// Dxyn: Drawing the same sprite twice collides, and erases it
    #[test]
    fn draw_twice() {
        let mut cpu = setup_environment();
        draw_glyph(&mut cpu, 8, 20, 20);
        assert_eq!(0, cpu.v[0xf]);
        assert!(cpu.screen.lit() > 0);
        draw_glyph(&mut cpu, 8, 20, 20);
        assert_eq!(1, cpu.v[0xf]);
        assert_eq!(0, cpu.screen.lit());
    }

    /// Dxyn: The collision flag only reflects the latest draw
    #[test]
    fn collision_is_not_sticky() {
        let mut cpu = setup_environment();
        draw_glyph(&mut cpu, 1, 0, 0);
        draw_glyph(&mut cpu, 1, 0, 0);
        assert_eq!(1, cpu.v[0xf]);
        draw_glyph(&mut cpu, 1, 30, 10);
        assert_eq!(0, cpu.v[0xf]);
    }

    /// Dxyn: Sprites wrap around both edges of the screen
    #[test]
    fn draw_wraps() {
        let mut cpu = setup_environment();
        cpu.mem.write(0x300, 0xff).unwrap();
        cpu.mem.write(0x301, 0xff).unwrap();
        cpu.i = 0x300;
        cpu.v[1] = (WIDTH - 4) as u8;
        cpu.v[2] = (HEIGHT - 1) as u8;
        cpu.draw(1, 2, 2).unwrap();
        for col in 0..8 {
            assert!(cpu.screen.get(WIDTH - 4 + col, HEIGHT - 1));
            assert!(cpu.screen.get(WIDTH - 4 + col, 0));
        }
        assert!(cpu.screen.get(0, 0) && cpu.screen.get(3, 0));
        assert!(!cpu.screen.get(4, 0));
        assert_eq!(16, cpu.screen.lit());
    }

    /// Dxyn: Coordinates past the edge start wrapped
    #[test]
    fn draw_start_wraps() {
        let mut cpu = setup_environment();
        draw_glyph(&mut cpu, 1, 64 + 2, 32 + 3);
        let mut other = setup_environment();
        draw_glyph(&mut other, 1, 2, 3);
        assert_eq!(other.screen, cpu.screen);
    }

    /// Dxyn: A sprite hanging off the end of memory is an error, and changes nothing
    #[test]
    fn draw_out_of_bounds() {
        let mut cpu = setup_environment();
        cpu.i = 0xffe;
        cpu.v[0xf] = 0x42;
        put_word(&mut cpu, 0xd124);
        let before = cpu.clone();
        assert!(matches!(
            cpu.cycle(),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(before, cpu);
    }
}

mod io {
    use super::*;

    /// Ex9E and ExA1: Skip on key state, for every key
    #[test]
    fn skip_key() {
        let mut cpu = setup_environment();
        for key in 0..0x10 {
            cpu.v[3] = key as u8;
            cpu.pc = 0x200;
            cpu.skip_key_equals(3);
            assert_eq!(0x200, cpu.pc);
            cpu.skip_key_not_equals(3);
            assert_eq!(0x202, cpu.pc);

            cpu.key_down(key);
            cpu.pc = 0x200;
            cpu.skip_key_equals(3);
            assert_eq!(0x202, cpu.pc);
            cpu.skip_key_not_equals(3);
            assert_eq!(0x202, cpu.pc);
            cpu.key_up(key);
        }
    }

    /// Fx07, Fx15, Fx18: Timers load and store
    #[test]
    fn timers() {
        let mut cpu = setup_environment();
        for value in 0..=0xff {
            cpu.v[1] = value;
            cpu.store_delay_timer(1);
            cpu.store_sound_timer(1);
            assert_eq!((value, value), (cpu.delay(), cpu.sound()));
            cpu.load_delay_timer(2);
            assert_eq!(value, cpu.v[2]);
        }
    }

    /// Timers count down once per tick and stop at zero
    #[test]
    fn tick_timers() {
        let mut cpu = setup_environment();
        cpu.delay = 3;
        cpu.sound = 1;
        cpu.tick_timers();
        assert_eq!((2, 0), (cpu.delay, cpu.sound));
        assert!(!cpu.sound_active());
        cpu.tick_timers();
        cpu.tick_timers();
        cpu.tick_timers();
        assert_eq!((0, 0), (cpu.delay, cpu.sound));
    }

    /// Timers don't move with the cycle count
    #[test]
    fn cycles_leave_timers_alone() {
        let mut cpu = setup_environment();
        cpu.delay = 10;
        cpu.multistep(100).unwrap();
        assert_eq!(10, cpu.delay);
    }

    /// Fx0A: Waits for a key, then stores it in vX
    #[test]
    fn wait_for_key() {
        let mut cpu = setup_environment();
        run_word(&mut cpu, 0xf50a).unwrap();
        assert!(cpu.is_paused());
        assert_eq!(0x202, cpu.pc);
        // Paused: cycles change nothing
        let before = cpu.clone();
        cpu.multistep(10).unwrap();
        assert_eq!(before, cpu);
        // An out of range key doesn't count
        assert!(!cpu.key_down(0x10));
        assert!(cpu.is_paused());
        assert!(cpu.key_down(0xb));
        assert!(!cpu.is_paused());
        assert_eq!(0xb, cpu.v[5]);
        assert_eq!(0x202, cpu.pc);
    }

    /// Fx0A: A key already held doesn't release the wait
    #[test]
    fn wait_for_fresh_key() {
        let mut cpu = setup_environment();
        cpu.key_down(0x3);
        run_word(&mut cpu, 0xf00a).unwrap();
        assert!(!cpu.key_down(0x3));
        assert!(cpu.is_paused());
        cpu.key_up(0x3);
        cpu.key_down(0x3);
        assert!(!cpu.is_paused());
        assert_eq!(0x3, cpu.v[0]);
    }

    /// Fx33: BCD convert X into I[0..3]
    #[test]
    fn bcd_convert() {
        let mut cpu = setup_environment();
        cpu.i = 0x400;
        for value in 0..=0xff_u8 {
            cpu.v[0xa] = value;
            cpu.bcd_convert(0xa).unwrap();
            let digits = cpu.mem.get(0x400, 3).unwrap();
            assert_eq!(value as usize, digits[0] as usize * 100 + digits[1] as usize * 10 + digits[2] as usize);
            assert!(digits.iter().all(|&d| d < 10));
        }
    }

    /// Fx33: BCD at the end of memory fails without writing
    #[test]
    fn bcd_out_of_bounds() {
        let mut cpu = setup_environment();
        cpu.i = 0xffe;
        cpu.v[0] = 123;
        assert!(cpu.bcd_convert(0).is_err());
        assert_eq!(0, cpu.mem.read(0xffe).unwrap());
    }

    /// Fx55: DMA Stor from I to registers 0..=X
    #[test]
    fn store_dma() {
        let mut cpu = setup_environment();
        for x in 0..=0xf {
            cpu.v = random();
            cpu.i = 0x500;
            cpu.store_dma(x).unwrap();
            assert_eq!(&cpu.v[..=x], cpu.mem.get(0x500, x + 1).unwrap());
            assert_eq!(0x500 + x as u16 + 1, cpu.i);
        }
    }

    /// Fx65: DMA Load from I to registers 0..=X
    #[test]
    fn load_dma() {
        let mut cpu = setup_environment();
        let data: [u8; 16] = random();
        cpu.mem.get_mut(0x600, 16).unwrap().copy_from_slice(&data);
        for x in 0..=0xf {
            cpu.v = [0; 16];
            cpu.i = 0x600;
            cpu.load_dma(x).unwrap();
            assert_eq!(&data[..=x], &cpu.v[..=x]);
            assert!(cpu.v[x + 1..].iter().all(|&v| v == 0));
            assert_eq!(0x600 + x as u16 + 1, cpu.i);
        }
    }

    /// Fx55/Fx65: With the quirk on, I is left where it was
    #[test]
    fn dma_quirk() {
        let mut cpu = setup_environment();
        cpu.flags.quirks.dma_inc = true;
        cpu.i = 0x700;
        cpu.store_dma(0xf).unwrap();
        cpu.load_dma(0xf).unwrap();
        assert_eq!(0x700, cpu.i);
    }
}

mod behavior {
    use super::*;

    #[test]
    fn fetch_past_end_of_memory() {
        let mut cpu = setup_environment();
        cpu.pc = 0xfff;
        let before = cpu.clone();
        assert!(matches!(cpu.cycle(), Err(Error::OutOfBounds { addr: 0x1000 })));
        assert_eq!(before, cpu);
    }

    #[test]
    fn user_pause() {
        let mut cpu = setup_environment();
        cpu.flags.pause();
        cpu.multistep(5).unwrap();
        assert_eq!(0, cpu.cycles());
        cpu.flags.pause();
        cpu.multistep(5).unwrap();
        assert_eq!(5, cpu.cycles());
    }

    #[test]
    fn reset() {
        let mut cpu = setup_environment();
        cpu.flags.quirks = true.into();
        cpu.v = random();
        cpu.i = 0x123;
        cpu.pc = 0x456;
        cpu.stack.push(0x222);
        cpu.delay = 9;
        cpu.key_down(4);
        cpu.screen.toggle(1, 1, true);
        cpu.flags.keypause = true;
        cpu.reset();
        assert_eq!(
            CPU {
                flags: Flags {
                    quirks: true.into(),
                    ..Default::default()
                },
                mem: cpu.mem.clone(),
                ..CPU::default()
            },
            cpu
        );
    }

    #[test]
    fn dump() {
        let mut cpu = setup_environment();
        cpu.v[0xa] = 0xbc;
        let dump = cpu.dump();
        assert!(dump.starts_with("PC: 0200, SP: 0000, I: 0000"));
        assert!(dump.contains("vA: bc"));
    }
}
