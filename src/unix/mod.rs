pub use self::terminal::{
    Attributes, Session,
};

mod terminal;
