use crate::error::CodecError;
use crate::record::Record;
use crate::shape::Shape;

/// A Rust type with an explicitly declared [`Shape`].
///
/// Implementors write out their field list by hand (no reflection) and
/// convert to and from the dynamic [`Record`] the codec works on. Register
/// the shape with [`RegistryBuilder::model`](crate::registry::RegistryBuilder::model)
/// together with the shapes of any nested models.
pub trait Model: Sized {
    fn shape() -> Shape;

    fn to_record(&self) -> Record;

    /// Errors carry paths relative to `record`; nested models should be
    /// re-rooted with [`CodecError::within`].
    fn from_record(record: &Record) -> Result<Self, CodecError>;

    fn shape_name() -> String {
        Self::shape().name().to_owned()
    }
}
