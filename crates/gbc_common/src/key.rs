/// Host keys a front end can report. Only the keys the emulator maps onto
/// the joypad are listed; everything else is reported as `None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Z,
    X,
    Enter,
    Backspace,
    Escape,
    None,
}
