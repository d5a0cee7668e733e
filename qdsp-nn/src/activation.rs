use qdsp_core::kernel;

/// `x = max(x, 0)` in place.
pub fn relu_s8(data: &mut [i8]) {
    kernel::active().relu_s8(data)
}

pub fn relu_s16(data: &mut [i16]) {
    kernel::active().relu_s16(data)
}

/// `x = min(max(x, 0), 6)` in place.
pub fn relu6_s8(data: &mut [i8]) {
    for v in data.iter_mut() {
        *v = (*v).clamp(0, 6);
    }
}
