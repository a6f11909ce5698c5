/// Prints bytes with non-printable characters escaped.
#[derive(Display)]
#[display("{:?}", self)]
pub struct EscapedBytes<'a>(pub &'a [u8]);

impl std::fmt::Debug for EscapedBytes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.0 {
            write!(f, "{}", std::ascii::escape_default(b))?
        }
        Ok(())
    }
}
