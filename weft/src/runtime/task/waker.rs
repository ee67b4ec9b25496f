use crate::runtime::task::Task;

use std::mem;
use std::sync::Arc;
use std::task::{RawWaker, RawWakerVTable, Waker};

/// Returns the `RawWakerVTable` for a coroutine of result type `T`.
///
/// The vtable defines how the scheduler interacts with the coroutine
/// when cloning, waking, waking by reference, or dropping the waker.
///
/// # Safety
///
/// All functions in the vtable must uphold the invariants required by
/// [`RawWaker`]: reference counts are managed exactly, and the task
/// stays valid for the lifetime of the waker.
fn vtable<T: Send + 'static>() -> &'static RawWakerVTable {
    &RawWakerVTable::new(
        clone_raw::<T>,
        wake_raw::<T>,
        wake_by_ref_raw::<T>,
        drop_raw::<T>,
    )
}

/// Creates a [`Waker`] that resumes the given coroutine.
///
/// Waking schedules the coroutine back onto the execution context it
/// was launched on.
///
/// # Safety
///
/// The pointer stored inside the `RawWaker` originates from
/// `Arc::into_raw` and follows proper reference counting semantics in
/// every vtable function. This function is safe to call as long as
/// [`Task::wake`] upholds the resume protocol.
pub(crate) fn make_waker<T: Send + 'static>(task: Arc<Task<T>>) -> Waker {
    unsafe {
        Waker::from_raw(RawWaker::new(
            Arc::into_raw(task) as *const (),
            vtable::<T>(),
        ))
    }
}

/// Clones the raw waker.
///
/// Increments the reference count of the underlying `Arc<Task<T>>` and
/// returns a new `RawWaker` pointing at the same coroutine.
fn clone_raw<T: Send + 'static>(ptr: *const ()) -> RawWaker {
    let arc = unsafe { Arc::<Task<T>>::from_raw(ptr as *const Task<T>) };
    let cloned = arc.clone();
    mem::forget(arc);

    RawWaker::new(Arc::into_raw(cloned) as *const (), vtable::<T>())
}

/// Wakes the coroutine and consumes the waker.
///
/// Transfers ownership of the `Arc<Task<T>>` into [`Task::wake`],
/// potentially scheduling the coroutine for another slice.
fn wake_raw<T: Send + 'static>(ptr: *const ()) {
    let arc = unsafe { Arc::<Task<T>>::from_raw(ptr as *const Task<T>) };
    arc.wake();
}

/// Wakes the coroutine without consuming the waker.
///
/// The underlying `Arc<Task<T>>` is cloned to preserve the original
/// reference count.
fn wake_by_ref_raw<T: Send + 'static>(ptr: *const ()) {
    let arc = unsafe { Arc::<Task<T>>::from_raw(ptr as *const Task<T>) };
    arc.clone().wake();
    mem::forget(arc);
}

/// Drops the raw waker.
///
/// Decrements the reference count of the underlying `Arc<Task<T>>`.
fn drop_raw<T: Send + 'static>(ptr: *const ()) {
    unsafe { Arc::<Task<T>>::from_raw(ptr as *const Task<T>) };
}
