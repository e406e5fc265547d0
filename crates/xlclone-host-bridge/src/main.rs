//! xlclone host bridge: the Windows-side process that drives Excel over COM.
//!
//! Designed to be cross-compiled from Linux and run under WINE, next to the
//! Excel instance that has the workbooks open.
//!
//! The wire format is newline-delimited JSON: one `Request` per line on
//! stdin, one `Response` per line on stdout. Diagnostics go to stderr only,
//! so stdout carries nothing but protocol lines.

#[cfg(windows)]
mod dispatch;
#[cfg(windows)]
mod excel;

#[cfg(not(windows))]
fn main() {
    eprintln!("xlclone-host-bridge must be compiled for Windows (--target x86_64-pc-windows-gnu)");
    eprintln!("and run under WINE on Linux.");
    std::process::exit(1);
}

#[cfg(windows)]
fn main() {
    use std::io::{self, BufRead, Write};

    use xlclone_host_protocol::*;

    eprintln!("[xlclone-host-bridge] Starting up...");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut excel: Option<excel::ExcelApp> = None;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("[xlclone-host-bridge] stdin read error: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("[xlclone-host-bridge] JSON parse error: {e}");
                eprintln!("[xlclone-host-bridge] Line was: {line}");
                // An unparseable request has no usable id; answer with id=0
                let resp = Response {
                    id: 0,
                    result: ResponseResult::Error {
                        message: format!("JSON parse error: {e}"),
                    },
                };
                let _ = writeln!(out, "{}", serde_json::to_string(&resp).unwrap());
                let _ = out.flush();
                continue;
            }
        };

        let response = handle_command(&mut excel, &request);
        let json = serde_json::to_string(&response).unwrap();
        let _ = writeln!(out, "{json}");
        let _ = out.flush();

        // A successful shutdown ends the loop
        if matches!(request.command, Command::Shutdown) {
            if matches!(response.result, ResponseResult::Ok { .. }) {
                eprintln!("[xlclone-host-bridge] Shutdown complete, exiting.");
                break;
            }
        }
    }

    // If Excel is still attached when stdin closes, try to clean up
    if let Some(app) = excel {
        eprintln!("[xlclone-host-bridge] stdin closed, releasing Excel...");
        let _ = app.shutdown();
    }

    eprintln!("[xlclone-host-bridge] Process exiting.");
}

#[cfg(windows)]
fn handle_command(
    excel: &mut Option<excel::ExcelApp>,
    request: &xlclone_host_protocol::Request,
) -> xlclone_host_protocol::Response {
    use xlclone_host_protocol::*;

    let id = request.id;

    let result = match &request.command {
        Command::Connect { allow_launch } => connect_excel(excel, *allow_launch),
        Command::ListWorkbooks => with_excel(excel, |app| {
            let workbooks = app.list_workbooks()?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Workbooks { workbooks }),
            })
        }),
        Command::OpenWorkbook { path, read_only } => with_excel(excel, |app| {
            let handle = app.open_workbook(path, *read_only)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::WorkbookHandle { workbook: handle }),
            })
        }),
        Command::SaveCopy { workbook, dest } => with_excel(excel, |app| {
            app.save_copy(*workbook, dest)?;
            Ok(ResponseResult::Ok { data: None })
        }),
        Command::CloseWorkbook { workbook } => with_excel(excel, |app| {
            app.close_workbook(*workbook)?;
            Ok(ResponseResult::Ok { data: None })
        }),
        Command::SheetNames { workbook } => with_excel(excel, |app| {
            let sheets = app.sheet_names(*workbook)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Sheets { sheets }),
            })
        }),
        Command::UsedRegion { workbook, sheet } => with_excel(excel, |app| {
            let region = app.used_region(*workbook, *sheet)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Region { region }),
            })
        }),
        Command::RegionValues { workbook, sheet } => with_excel(excel, |app| {
            let values = app.region_values(*workbook, *sheet)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Values { values }),
            })
        }),
        Command::CellFont {
            workbook,
            sheet,
            row,
            col,
        } => with_excel(excel, |app| {
            let font = app.cell_font(*workbook, *sheet, *row, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Font { font }),
            })
        }),
        Command::CellInterior {
            workbook,
            sheet,
            row,
            col,
        } => with_excel(excel, |app| {
            let interior = app.cell_interior(*workbook, *sheet, *row, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Interior { interior }),
            })
        }),
        Command::CellAlignment {
            workbook,
            sheet,
            row,
            col,
        } => with_excel(excel, |app| {
            let alignment = app.cell_alignment(*workbook, *sheet, *row, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Alignment { alignment }),
            })
        }),
        Command::CellNumberFormat {
            workbook,
            sheet,
            row,
            col,
        } => with_excel(excel, |app| {
            let number_format = app.cell_number_format(*workbook, *sheet, *row, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::NumberFormat { number_format }),
            })
        }),
        Command::CellBorders {
            workbook,
            sheet,
            row,
            col,
        } => with_excel(excel, |app| {
            let borders = app.cell_borders(*workbook, *sheet, *row, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Borders { borders }),
            })
        }),
        Command::MergeArea {
            workbook,
            sheet,
            row,
            col,
        } => with_excel(excel, |app| {
            let merge = app.merge_area(*workbook, *sheet, *row, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Merge { merge }),
            })
        }),
        Command::ColumnWidth {
            workbook,
            sheet,
            col,
        } => with_excel(excel, |app| {
            let width = app.column_width(*workbook, *sheet, *col)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Width { width }),
            })
        }),
        Command::RowHeight {
            workbook,
            sheet,
            row,
        } => with_excel(excel, |app| {
            let height = app.row_height(*workbook, *sheet, *row)?;
            Ok(ResponseResult::Ok {
                data: Some(ResponseData::Height { height }),
            })
        }),
        Command::Shutdown => match excel.take() {
            Some(app) => match app.shutdown() {
                Ok(()) => {
                    uninit_com();
                    ResponseResult::Ok { data: None }
                }
                Err(e) => ResponseResult::Error {
                    message: format!("Shutdown failed: {e}"),
                },
            },
            None => ResponseResult::Ok { data: None },
        },
    };

    Response { id, result }
}

#[cfg(windows)]
fn connect_excel(
    excel: &mut Option<excel::ExcelApp>,
    allow_launch: bool,
) -> xlclone_host_protocol::ResponseResult {
    use windows::Win32::System::Com::{CoInitializeEx, COINIT_APARTMENTTHREADED};
    use xlclone_host_protocol::{ConnectInfo, ResponseData, ResponseResult};

    if let Some(app) = excel.as_ref() {
        // Already connected; repeat the original answer.
        return ResponseResult::Ok {
            data: Some(ResponseData::Connected {
                connected: ConnectInfo {
                    launched: app.launched(),
                },
            }),
        };
    }

    // Excel requires a single-threaded apartment
    unsafe {
        let hr = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
        if let Err(e) = hr.ok() {
            return ResponseResult::Error {
                message: format!("CoInitializeEx failed: {e}"),
            };
        }
    }

    eprintln!("[xlclone-host-bridge] COM initialized (STA)");

    match excel::ExcelApp::connect(allow_launch) {
        Ok(app) => {
            let launched = app.launched();
            if launched {
                eprintln!("[xlclone-host-bridge] launched a hidden Excel instance");
            } else {
                eprintln!("[xlclone-host-bridge] attached to the running Excel instance");
            }
            *excel = Some(app);
            ResponseResult::Ok {
                data: Some(ResponseData::Connected {
                    connected: ConnectInfo { launched },
                }),
            }
        }
        Err(e) => ResponseResult::Error {
            message: format!("Failed to connect to Excel: {e}"),
        },
    }
}

#[cfg(windows)]
fn uninit_com() {
    unsafe {
        windows::Win32::System::Com::CoUninitialize();
    }
    eprintln!("[xlclone-host-bridge] COM uninitialized");
}

#[cfg(windows)]
fn with_excel(
    excel: &mut Option<excel::ExcelApp>,
    f: impl FnOnce(&mut excel::ExcelApp) -> Result<xlclone_host_protocol::ResponseResult, String>,
) -> xlclone_host_protocol::ResponseResult {
    match excel.as_mut() {
        Some(app) => match f(app) {
            Ok(r) => r,
            Err(e) => xlclone_host_protocol::ResponseResult::Error { message: e },
        },
        None => xlclone_host_protocol::ResponseResult::Error {
            message: "Excel not connected. Send 'Connect' command first.".to_string(),
        },
    }
}
