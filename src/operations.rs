use ::rand::Rng;

use crate::config::{KeyOperand, ShiftSource};
use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, GLYPH_SIZE, INSTRUCTION_SIZE, MAX_SPRITE_HEIGHT,
    REGISTER_COUNT,
};
use crate::error::Result;
use crate::instruction::{Context, Effect};
use crate::opcode::Opcode;
use crate::state::State;

// Every operation validates before it mutates: an `Err` leaves `state` untouched.

/// exit(n)
/// Matches 0?1N; the second nibble is ignored
pub fn exit(op: u16, _state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    Ok(Effect::Exit(op.n()))
}

/// clear
pub fn clr(_op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.clear_frame();
    state.advance();
    Ok(Effect::Redraw)
}

/// PC = STACK.pop()
/// The popped address already points past the call
pub fn rts(_op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let addr = state.pop_return()?;
    state.jump(addr);
    Ok(Effect::Continue)
}

/// PC = addr
pub fn jump(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.jump(op.addr());
    Ok(Effect::Continue)
}

/// STACK.push(PC + 2); PC = addr
pub fn call(op: u16, state: &mut State, ctx: &mut Context) -> Result<Effect> {
    let ret = state.pc.wrapping_add(INSTRUCTION_SIZE);
    state.push_return(ret, ctx.quirks.stack_limit)?;
    state.jump(op.addr());
    Ok(Effect::Continue)
}

fn skip_if(state: &mut State, condition: bool) -> Result<Effect> {
    state.advance();
    if condition {
        state.advance();
    }
    Ok(Effect::Continue)
}

/// if Vx == kk then pc += 2
pub fn ske(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let condition = state.v[op.x()] == op.kk();
    skip_if(state, condition)
}

/// if Vx != kk then pc += 2
pub fn skne(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let condition = state.v[op.x()] != op.kk();
    skip_if(state, condition)
}

/// if Vx == Vy then pc += 2
pub fn skre(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let condition = state.v[op.x()] == state.v[op.y()];
    skip_if(state, condition)
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let condition = state.v[op.x()] != state.v[op.y()];
    skip_if(state, condition)
}

/// Vx = kk
pub fn load(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.set_register(op.x(), op.kk());
    state.advance();
    Ok(Effect::Continue)
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it, VF is untouched
pub fn add(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let res = state.v[op.x()].wrapping_add(op.kk());
    state.set_register(op.x(), res);
    state.advance();
    Ok(Effect::Continue)
}

/// Vx = Vy
pub fn mv(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.set_register(op.x(), state.v[op.y()]);
    state.advance();
    Ok(Effect::Continue)
}

/// Vx |= Vy
pub fn or(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.v[op.x()] |= state.v[op.y()];
    state.advance();
    Ok(Effect::Continue)
}

/// Vx &= Vy
pub fn and(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.v[op.x()] &= state.v[op.y()];
    state.advance();
    Ok(Effect::Continue)
}

/// Vx ^= Vy
pub fn xor(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.v[op.x()] ^= state.v[op.y()];
    state.advance();
    Ok(Effect::Continue)
}

// Operands are read up front. 8XY4, 8XY5, 8XY6 and 8XYE write VF before Vx, so when X
// is F the result wins; 8XY7 writes Vx first and the flag wins.

/// VF = overflow; Vx += Vy
pub fn addr(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.set_flag(over);
    state.set_register(op.x(), res);
    state.advance();
    Ok(Effect::Continue)
}

/// VF = Vx > Vy; Vx -= Vy
pub fn sub(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    state.set_flag(vx > vy);
    state.set_register(op.x(), vx.wrapping_sub(vy));
    state.advance();
    Ok(Effect::Continue)
}

/// Vx = Vy - Vx; VF = !(Vy < Vx)
pub fn subn(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    state.set_register(op.x(), vy.wrapping_sub(vx));
    state.set_flag(vy >= vx);
    state.advance();
    Ok(Effect::Continue)
}

fn shift_source(op: u16, state: &State, ctx: &Context) -> u8 {
    match ctx.quirks.shift {
        ShiftSource::Vy => state.v[op.y()],
        ShiftSource::Vx => state.v[op.x()],
    }
}

/// VF = lsb(src); Vx = src >> 1
pub fn shr(op: u16, state: &mut State, ctx: &mut Context) -> Result<Effect> {
    let src = shift_source(op, state, ctx);
    state.set_flag(src & 0x1 == 0x1);
    state.set_register(op.x(), src >> 1);
    state.advance();
    Ok(Effect::Continue)
}

/// VF = msb(Vx); Vx = src << 1
/// The flag always comes from Vx, whichever register is shifted
pub fn shl(op: u16, state: &mut State, ctx: &mut Context) -> Result<Effect> {
    let msb = state.v[op.x()] >> 7;
    let src = shift_source(op, state, ctx);
    state.set_flag(msb == 0x1);
    state.set_register(op.x(), src << 1);
    state.advance();
    Ok(Effect::Continue)
}

/// I = addr
pub fn loadi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.set_index(op.addr());
    state.advance();
    Ok(Effect::Continue)
}

/// PC = kk + Vx
pub fn jumpi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.jump(u16::from(op.kk()) + u16::from(state.v[op.x()]));
    Ok(Effect::Continue)
}

/// Vx = rand_byte & kk
pub fn rand(op: u16, state: &mut State, ctx: &mut Context) -> Result<Effect> {
    let rand_byte: u8 = ctx.rng.gen();
    state.set_register(op.x(), rand_byte & op.kk());
    state.advance();
    Ok(Effect::Continue)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n onto the FrameBuffer at x, y.
/// The origin wraps around the display; the sprite itself is clipped at the edges.
/// Sets VF if any lit pixel is erased
pub fn draw(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let origin_x = state.v[op.x()] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[op.y()] as usize % DISPLAY_HEIGHT;
    let height = (op.n() as usize).min(MAX_SPRITE_HEIGHT);
    let rows = height.min(DISPLAY_HEIGHT - origin_y);
    let cols = 8usize.min(DISPLAY_WIDTH - origin_x);

    let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
    sprite[..rows].copy_from_slice(state.read(state.i as usize, rows)?);

    let mut collision = false;
    for (row, byte) in sprite[..rows].iter().enumerate() {
        let y = origin_y + row;
        for bit in 0..cols {
            if byte & (0x80u8 >> bit) == 0 {
                continue;
            }
            let x = origin_x + bit;
            let lit = state.pixel(x, y);
            collision |= lit;
            state.set_pixel(x, y, !lit);
        }
    }

    state.set_flag(collision);
    state.advance();
    Ok(Effect::Redraw)
}

fn key_operand(op: u16, state: &State, ctx: &Context) -> u8 {
    match ctx.quirks.key_operand {
        KeyOperand::Nibble => op.x() as u8,
        KeyOperand::Register => state.v[op.x()],
    }
}

/// if key.pressed then pc += 2
pub fn skpr(op: u16, state: &mut State, ctx: &mut Context) -> Result<Effect> {
    let condition = ctx.keys.is_pressed(key_operand(op, state, ctx));
    skip_if(state, condition)
}

/// if !key.pressed then pc += 2
pub fn skup(op: u16, state: &mut State, ctx: &mut Context) -> Result<Effect> {
    let condition = !ctx.keys.is_pressed(key_operand(op, state, ctx));
    skip_if(state, condition)
}

/// Vx = DT
pub fn moved(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.set_register(op.x(), state.delay_timer);
    state.advance();
    Ok(Effect::Continue)
}

/// DT = Vx
pub fn loads(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.delay_timer = state.v[op.x()];
    state.advance();
    Ok(Effect::Continue)
}

/// ST = Vx
pub fn ld(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.sound_timer = state.v[op.x()];
    state.advance();
    Ok(Effect::Continue)
}

/// I += Vx
pub fn addi(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.set_index(state.i + u16::from(state.v[op.x()]));
    state.advance();
    Ok(Effect::Continue)
}

/// I = Vx * 5
/// Set I to the memory address of the glyph for Vx
/// See constants::SPRITE_SHEET
pub fn ldspr(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    state.set_index(u16::from(state.v[op.x()]) * GLYPH_SIZE);
    state.advance();
    Ok(Effect::Continue)
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let vx = state.v[op.x()];
    let addr = state.i as usize;
    state.write(addr, &[vx / 100, vx / 10 % 10, vx % 10])?;
    state.advance();
    Ok(Effect::Continue)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let count = op.x() + 1;
    let registers = state.v;
    let addr = state.i as usize;
    state.write(addr, &registers[..count])?;
    state.advance();
    Ok(Effect::Continue)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: u16, state: &mut State, _ctx: &mut Context) -> Result<Effect> {
    let count = op.x() + 1;
    let mut loaded = [0u8; REGISTER_COUNT];
    loaded[..count].copy_from_slice(state.read(state.i as usize, count)?);
    state.v[..count].copy_from_slice(&loaded[..count]);
    state.advance();
    Ok(Effect::Continue)
}
