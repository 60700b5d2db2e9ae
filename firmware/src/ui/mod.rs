use ascii::AsciiChar;
use adafruit_alphanum4::{
    AlphaNum4,
    Index,
    Error as AlphaNumError,
};

/// Turns weld settings into what's shown on the display
pub mod presenter;

const BLANK: AsciiChar = AsciiChar::new(' ');
const DISPLAY_CHARS: usize = 4;

/// A 4 character text message
pub type Message = [AsciiChar; DISPLAY_CHARS];

/// Trait to make different values displayable on the adafruit_alphanum4 display
pub trait Displayable {
    /// Display self on the provided display, filling all 4 characters
    fn display<D, T>(&self, display: &mut D) -> Result<(), AlphaNumError>
    where
        D: AlphaNum4<T>;
}

/// Splits `value` into 4 right aligned decimal digits with leading blanks.
/// `None` if it needs more than 4 digits
pub fn digits(value: u32) -> Option<[Option<u8>; DISPLAY_CHARS]> {
    if value >= 10_u32.pow(DISPLAY_CHARS as u32) {
        return None;
    }

    let mut out = [None; DISPLAY_CHARS];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = Some((rest % 10) as u8);
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    Some(out)
}

/// A number shown right aligned with the point after `dot` lit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number {
    /// The number to show
    pub value: u32,
    /// Which character has its point lit
    pub dot: Option<u8>,
}

impl Displayable for Number {
    fn display<D, T>(&self, display: &mut D) -> Result<(), AlphaNumError>
    where
        D: AlphaNum4<T>,
    {
        let digits = digits(self.value).ok_or(AlphaNumError::InsufficientDigits)?;

        for (i, digit) in digits.iter().enumerate() {
            let index = Index::from(i as u8);
            match digit {
                Some(d) => display.update_buffer_with_digit(index, *d),
                None => display.update_buffer_with_char(index, BLANK),
            }
            display.update_buffer_with_dot(index, self.dot == Some(i as u8));
        }

        Ok(())
    }
}

impl Displayable for Message {
    fn display<D, T>(&self, display: &mut D) -> Result<(), AlphaNumError>
    where
        D: AlphaNum4<T>,
    {
        for (i, ch) in self.iter().enumerate() {
            let index = Index::from(i as u8);
            display.update_buffer_with_char(index, *ch);
            display.update_buffer_with_dot(index, false);
        }
        Ok(())
    }
}
