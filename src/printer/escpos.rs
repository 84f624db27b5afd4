//! ESC/POS byte encoding for Epson-compatible thermal printers.

use super::ticket::{Align, Op, Ticket};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Code page 16: WPC1252, which covers Latin-1 accents and `ñ`.
const CODE_PAGE_WPC1252: u8 = 16;

pub fn encode(ticket: &Ticket) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    // initialize, then select the code page `push_text` targets
    buf.extend_from_slice(&[ESC, b'@']);
    buf.extend_from_slice(&[ESC, b't', CODE_PAGE_WPC1252]);

    for op in ticket.ops() {
        match op {
            Op::Align(a) => {
                let n = match a {
                    Align::Left => 0,
                    Align::Center => 1,
                    Align::Right => 2,
                };
                buf.extend_from_slice(&[ESC, b'a', n]);
            }
            Op::Bold(on) => buf.extend_from_slice(&[ESC, b'E', u8::from(*on)]),
            Op::Line(text) => {
                push_text(&mut buf, text);
                buf.push(LF);
            }
            Op::Rule => {
                push_text(&mut buf, &ticket.rule());
                buf.push(LF);
            }
            Op::Feed => buf.push(LF),
            // feed to the cutter, then partial cut
            Op::Cut => buf.extend_from_slice(&[GS, b'V', 66, 0]),
        }
    }

    buf
}

/// Latin-1 characters map 1:1 onto WPC1252; anything else becomes `?`.
/// Control characters are dropped so a name can never inject commands.
fn push_text(buf: &mut Vec<u8>, text: &str) {
    for c in text.chars() {
        let code = c as u32;
        match code {
            0x20..=0x7E | 0xA0..=0xFF => buf.push(code as u8),
            0x00..=0x1F | 0x7F..=0x9F => {}
            _ => buf.push(b'?'),
        }
    }
}
