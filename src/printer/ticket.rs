//! Device-independent receipt layout.
//!
//! A `Ticket` is an ordered list of layout operations. The ESC/POS encoder
//! turns it into printer bytes and `plain_text` renders it for logs and tests.

const RULE_CHAR: char = '=';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Align(Align),
    Bold(bool),
    Line(String),
    Rule,
    Feed,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    width: usize,
    ops: Vec<Op>,
}

impl Ticket {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ops: Vec::new(),
        }
    }

    pub fn align(&mut self, align: Align) -> &mut Self {
        self.ops.push(Op::Align(align));
        self
    }

    pub fn align_center(&mut self) -> &mut Self {
        self.align(Align::Center)
    }

    pub fn align_left(&mut self) -> &mut Self {
        self.align(Align::Left)
    }

    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.ops.push(Op::Bold(on));
        self
    }

    pub fn println(&mut self, text: impl Into<String>) -> &mut Self {
        self.ops.push(Op::Line(text.into()));
        self
    }

    pub fn draw_line(&mut self) -> &mut Self {
        self.ops.push(Op::Rule);
        self
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.ops.push(Op::Feed);
        self
    }

    pub fn cut(&mut self) -> &mut Self {
        self.ops.push(Op::Cut);
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn rule(&self) -> String {
        std::iter::repeat_n(RULE_CHAR, self.width).collect()
    }

    /// Text rendering with alignment applied; styling and the cut are dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let mut align = Align::Left;

        for op in &self.ops {
            match op {
                Op::Align(a) => align = *a,
                Op::Bold(_) | Op::Cut => {}
                Op::Line(text) => {
                    out.push_str(&self.aligned(text, align));
                    out.push('\n');
                }
                Op::Rule => {
                    out.push_str(&self.rule());
                    out.push('\n');
                }
                Op::Feed => out.push('\n'),
            }
        }
        out
    }

    fn aligned(&self, text: &str, align: Align) -> String {
        let len = text.chars().count();
        if len >= self.width {
            return text.to_string();
        }
        let pad = self.width - len;
        match align {
            Align::Left => text.to_string(),
            Align::Center => format!("{}{}", " ".repeat(pad / 2), text),
            Align::Right => format!("{}{}", " ".repeat(pad), text),
        }
    }
}
