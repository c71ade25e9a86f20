//! System tray icon with right-click context menu.
//! Uses Win32 Shell_NotifyIconW API directly, no extra crate needed.

#[cfg(windows)]
use std::sync::atomic::{AtomicU16, Ordering};

#[cfg(windows)]
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
#[cfg(windows)]
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
};
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DestroyWindow,
    GetCursorPos, LoadIconW, RegisterClassW, SetForegroundWindow, TrackPopupMenu,
    CS_HREDRAW, CS_VREDRAW, HMENU, IDI_APPLICATION, MF_SEPARATOR, MF_STRING, TPM_BOTTOMALIGN,
    TPM_LEFTALIGN, WM_COMMAND, WM_DESTROY, WM_USER, WNDCLASSW, WS_EX_TOOLWINDOW,
};

/// Custom message ID for tray icon callbacks.
#[cfg(windows)]
const WM_TRAYICON: u32 = WM_USER + 1;
/// Last menu selection, written by the window procedure. 0 = none.
#[cfg(windows)]
static PENDING_MENU_ID: AtomicU16 = AtomicU16::new(0);

/// Menu item IDs.
#[cfg(any(windows, test))]
const ID_SHOW: u16 = 1000;
#[cfg(any(windows, test))]
const ID_SLEEP: u16 = 1001;
#[cfg(any(windows, test))]
const ID_ABOUT: u16 = 1002;
#[cfg(any(windows, test))]
const ID_QUIT: u16 = 1003;

#[cfg(windows)]
const TOOLTIP: &str = "Chill the Ice Slime";

/// Commands returned from tray menu interactions.
#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    None,
    ToggleVisible,
    ToggleSleep,
    About,
    Quit,
}

impl TrayCommand {
    #[cfg(any(windows, test))]
    fn from_menu_id(id: u16) -> Self {
        match id {
            ID_SHOW => TrayCommand::ToggleVisible,
            ID_SLEEP => TrayCommand::ToggleSleep,
            ID_ABOUT => TrayCommand::About,
            ID_QUIT => TrayCommand::Quit,
            _ => TrayCommand::None,
        }
    }
}

/// System tray icon state.
pub struct TrayIcon {
    #[cfg(windows)]
    hwnd: HWND,
    #[cfg(windows)]
    nid: NOTIFYICONDATAW,
}

#[cfg(windows)]
impl TrayIcon {
    pub fn new() -> Option<Self> {
        unsafe {
            // Register a hidden window class for receiving tray messages.
            let class_name: Vec<u16> = "ChillPetTrayClass\0".encode_utf16().collect();
            let wc = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(tray_wnd_proc),
                lpszClassName: windows::core::PCWSTR(class_name.as_ptr()),
                ..Default::default()
            };
            RegisterClassW(&wc);

            use windows::Win32::Foundation::HINSTANCE;
            let hwnd = match CreateWindowExW(
                WS_EX_TOOLWINDOW,
                windows::core::PCWSTR(class_name.as_ptr()),
                windows::core::PCWSTR::null(),
                Default::default(),
                0,
                0,
                0,
                0,
                HWND::default(),
                HMENU::default(),
                HINSTANCE::default(),
                None,
            ) {
                Ok(hwnd) => hwnd,
                Err(e) => {
                    log::warn!("Failed to create tray message window: {e}");
                    return None;
                }
            };

            let mut nid = NOTIFYICONDATAW::default();
            nid.cbSize = std::mem::size_of::<NOTIFYICONDATAW>() as u32;
            nid.hWnd = hwnd;
            nid.uID = 1;
            nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
            nid.uCallbackMessage = WM_TRAYICON;
            nid.hIcon = LoadIconW(None, IDI_APPLICATION).unwrap_or_default();

            for (i, ch) in TOOLTIP.encode_utf16().enumerate() {
                if i >= nid.szTip.len() - 1 {
                    break;
                }
                nid.szTip[i] = ch;
            }

            if !Shell_NotifyIconW(NIM_ADD, &nid).as_bool() {
                log::warn!("Shell_NotifyIconW(NIM_ADD) failed, running without tray icon");
                let _ = DestroyWindow(hwnd);
                return None;
            }

            log::info!("System tray icon created");
            Some(Self { hwnd, nid })
        }
    }

    /// Poll for tray menu commands. Call once per loop iteration.
    pub fn poll(&mut self) -> TrayCommand {
        TrayCommand::from_menu_id(PENDING_MENU_ID.swap(0, Ordering::Relaxed))
    }

    /// Remove the tray icon (called on shutdown).
    pub fn remove(&mut self) {
        unsafe {
            let _ = Shell_NotifyIconW(NIM_DELETE, &self.nid);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

#[cfg(windows)]
impl Drop for TrayIcon {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Window procedure for the hidden tray message window.
#[cfg(windows)]
unsafe extern "system" fn tray_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_TRAYICON {
        let event = (lparam.0 & 0xFFFF) as u32;
        // WM_RBUTTONUP = 0x0205
        if event == 0x0205 {
            show_context_menu(hwnd);
            return LRESULT(0);
        }
    }
    if msg == WM_COMMAND {
        PENDING_MENU_ID.store((wparam.0 & 0xFFFF) as u16, Ordering::Relaxed);
        return LRESULT(0);
    }
    if msg == WM_DESTROY {
        return LRESULT(0);
    }
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

/// Show the right-click context menu at the cursor position.
#[cfg(windows)]
unsafe fn show_context_menu(hwnd: HWND) {
    let hmenu = match CreatePopupMenu() {
        Ok(menu) => menu,
        Err(e) => {
            log::warn!("Failed to create tray menu: {e}");
            return;
        }
    };

    let items: &[(u16, &str)] = &[
        (ID_SHOW, "Show/Hide"),
        (ID_SLEEP, "Toggle Sleep"),
        (ID_ABOUT, "About"),
    ];

    for &(id, label) in items {
        let wide: Vec<u16> = label.encode_utf16().chain(std::iter::once(0)).collect();
        let _ = AppendMenuW(
            hmenu,
            MF_STRING,
            id as usize,
            windows::core::PCWSTR(wide.as_ptr()),
        );
    }

    let _ = AppendMenuW(hmenu, MF_SEPARATOR, 0, windows::core::PCWSTR::null());

    let quit_label: Vec<u16> = "Quit Chill\0".encode_utf16().collect();
    let _ = AppendMenuW(
        hmenu,
        MF_STRING,
        ID_QUIT as usize,
        windows::core::PCWSTR(quit_label.as_ptr()),
    );

    let mut pt = windows::Win32::Foundation::POINT::default();
    let _ = GetCursorPos(&mut pt);

    // Required so menu closes when clicking outside
    let _ = SetForegroundWindow(hwnd);

    let _ = TrackPopupMenu(
        hmenu,
        TPM_LEFTALIGN | TPM_BOTTOMALIGN,
        pt.x,
        pt.y,
        0,
        hwnd,
        None,
    );

    let _ = DestroyMenu(hmenu);
}

// Non-windows stub
#[cfg(not(windows))]
impl TrayIcon {
    pub fn new() -> Option<Self> {
        log::info!("No tray icon on this platform");
        None
    }
    pub fn poll(&mut self) -> TrayCommand {
        TrayCommand::None
    }
}
