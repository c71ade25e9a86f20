use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Dwm::DwmSetWindowAttribute;
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetWindowLongPtrW, SetWindowLongPtrW, SetWindowPos, GWL_EXSTYLE,
    SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, WS_EX_NOACTIVATE,
    WS_EX_TOOLWINDOW,
};

/// Extract the Win32 HWND from a winit window.
pub fn get_hwnd(window: &winit::window::Window) -> Option<HWND> {
    let handle = window.window_handle().ok()?;
    match handle.as_raw() {
        RawWindowHandle::Win32(h) => Some(HWND(h.hwnd.get() as *mut core::ffi::c_void)),
        _ => None,
    }
}

/// Keep the pet out of the taskbar and alt-tab, never steal focus,
/// and strip the DWM frame so only the sprite is visible.
pub unsafe fn make_tool_window(hwnd: HWND) {
    let style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
    let new_style = style | WS_EX_NOACTIVATE.0 as isize | WS_EX_TOOLWINDOW.0 as isize;
    SetWindowLongPtrW(hwnd, GWL_EXSTYLE, new_style);
    log::debug!("Window ex-style 0x{:08X} -> 0x{:08X}", style, new_style);

    // Force DWM to pick up the new styles.
    let _ = SetWindowPos(
        hwnd,
        HWND::default(),
        0,
        0,
        0,
        0,
        SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
    );

    // DWMWA_NCRENDERING_POLICY(2) = DWMNCRP_DISABLED(2)
    let policy = 2u32;
    let _ = DwmSetWindowAttribute(
        hwnd,
        windows::Win32::Graphics::Dwm::DWMWINDOWATTRIBUTE(2),
        &policy as *const u32 as *const core::ffi::c_void,
        4,
    );

    // DWMWA_WINDOW_CORNER_PREFERENCE(33) = DWMWCP_DONOTROUND(1)
    let corner = 1u32;
    let _ = DwmSetWindowAttribute(
        hwnd,
        windows::Win32::Graphics::Dwm::DWMWINDOWATTRIBUTE(33),
        &corner as *const u32 as *const core::ffi::c_void,
        4,
    );

    // DWMWA_BORDER_COLOR(34) = DWMWA_COLOR_NONE(0xFFFFFFFE)
    let no_border = 0xFFFFFFFEu32;
    let _ = DwmSetWindowAttribute(
        hwnd,
        windows::Win32::Graphics::Dwm::DWMWINDOWATTRIBUTE(34),
        &no_border as *const u32 as *const core::ffi::c_void,
        4,
    );
}

/// Apply tool-window styling to the pet window.
pub fn setup_pet_window(window: &winit::window::Window) {
    let Some(hwnd) = get_hwnd(window) else {
        log::warn!("No Win32 handle for pet window, skipping tool-window styling");
        return;
    };
    unsafe {
        make_tool_window(hwnd);
    }
    log::info!("Win32 pet window setup complete (toolwindow + no-activate)");
}

/// Global cursor position in physical screen pixels.
/// Needed because a click-through window receives no cursor events.
pub fn get_mouse_pos() -> (f32, f32) {
    let mut point = POINT::default();
    unsafe {
        let _ = GetCursorPos(&mut point);
    }
    (point.x as f32, point.y as f32)
}
