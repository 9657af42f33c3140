use core::any::Any;

mod array;
mod list;
mod map;
mod pointer;
mod scalar;
mod text;

/// Replaces the value in `target` with `value`. Both must hold a `T`.
pub(crate) fn assign<T: 'static>(target: &mut dyn Any, value: Box<dyn Any>) -> bool {
    match (target.downcast_mut::<T>(), value.downcast::<T>()) {
        (Some(slot), Ok(value)) => {
            *slot = *value;
            true
        }
        _ => false,
    }
}
