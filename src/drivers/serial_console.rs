use ufmt::uWrite;

/// Labels printed in front of each axis value
const AXIS_LABELS: [&str; 3] = ["X: ", "Y: ", "Z: "];

/// Decimal digits of the widest `i32` magnitude
const MAX_DIGITS: usize = 10;

/// Print `num` in decimal, returning the number of characters written.
///
/// Digits are peeled off least significant first into a fixed buffer and
/// then emitted in reverse. The magnitude is taken as `u32`, so `i32::MIN`
/// needs no special case.
pub fn print_decimal<W: uWrite + ?Sized>(out: &mut W, num: i32) -> Result<usize, W::Error> {
    let mut digits = [0u8; MAX_DIGITS];
    let mut ndx = 0;
    let mut rest = num.unsigned_abs();

    // runs at least once so zero prints as "0"
    loop {
        digits[ndx] = b'0' + (rest % 10) as u8;
        ndx += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }

    let mut len = 0;
    if num < 0 {
        out.write_char('-')?;
        len += 1;
    }
    for &digit in digits[..ndx].iter().rev() {
        out.write_char(char::from(digit))?;
        len += 1;
    }
    Ok(len)
}

/// Text console on top of any `ufmt` writer
pub struct SerialConsole<W> {
    out: W,
}

impl<W: uWrite> SerialConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn free(self) -> W {
        self.out
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), W::Error> {
        self.out.write_str(s)
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), W::Error> {
        self.write_str(s)?;
        self.write_str("\r\n")
    }

    pub fn write_char(&mut self, c: char) -> Result<(), W::Error> {
        self.out.write_char(c)
    }

    pub fn write_decimal(&mut self, num: i32) -> Result<usize, W::Error> {
        print_decimal(&mut self.out, num)
    }

    // Debug helper - print hex value
    pub fn write_hex(&mut self, val: u8) -> Result<(), W::Error> {
        const HEX_CHARS: [u8; 16] = *b"0123456789ABCDEF";
        self.write_char(char::from(HEX_CHARS[(val >> 4) as usize]))?;
        self.write_char(char::from(HEX_CHARS[(val & 0xF) as usize]))
    }

    // Print formatted debug info
    pub fn debug(&mut self, msg: &str, val: u8) -> Result<(), W::Error> {
        self.write_str("[DBG] ")?;
        self.write_str(msg)?;
        self.write_str(": 0x")?;
        self.write_hex(val)?;
        self.write_str("\r\n")
    }

    /// One labelled, tab separated row: `X: 1\tY: -2\tZ: 3`
    pub fn write_axes(&mut self, values: [i32; 3]) -> Result<(), W::Error> {
        for (i, (label, value)) in AXIS_LABELS.iter().zip(values).enumerate() {
            if i > 0 {
                self.write_char('\t')?;
            }
            self.write_str(label)?;
            self.write_decimal(value)?;
        }
        self.write_str("\r\n")
    }
}
