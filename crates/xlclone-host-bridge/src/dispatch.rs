//! Late-bound COM automation helpers built on IDispatch.
//!
//! Excel's COM API is primarily accessed through IDispatch (like VBScript
//! late-binding). This module provides ergonomic helpers for property
//! get/set, method invocation, and decoding the VARIANTs that come back,
//! including the 2-D SAFEARRAYs a bulk range read returns.

#![cfg(windows)]

use std::mem::ManuallyDrop;
use std::ptr;

use windows::{
    core::{IUnknown, Interface, BSTR, GUID, HSTRING, PCWSTR},
    Win32::{
        Foundation::{DISP_E_EXCEPTION, DISP_E_PARAMNOTFOUND, VARIANT_BOOL},
        Globalization::GetSystemDefaultLCID,
        System::{
            Com::{
                CLSIDFromProgID, CoCreateInstance, IDispatch, SAFEARRAY, CLSCTX_LOCAL_SERVER,
                DISPATCH_METHOD, DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS, EXCEPINFO,
            },
            Ole::{
                GetActiveObject, SafeArrayGetDim, SafeArrayGetElement, SafeArrayGetLBound,
                SafeArrayGetUBound, DISPID_PROPERTYPUT,
            },
            Variant::{
                VARIANT, VT_ARRAY, VT_BOOL, VT_BSTR, VT_DISPATCH, VT_EMPTY, VT_ERROR, VT_I2,
                VT_I4, VT_NULL, VT_R4, VT_R8, VT_VARIANT,
            },
        },
    },
};

// -- Building VARIANTs --
// The inner unions are wrapped in ManuallyDrop; ptr::write sets their fields
// without tripping the DerefMut lint.

/// Build a VARIANT holding a bool.
pub fn variant_bool(val: bool) -> VARIANT {
    unsafe {
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_BOOL);
        ptr::write(
            &mut inner.Anonymous.boolVal,
            VARIANT_BOOL(if val { -1 } else { 0 }),
        );
        v
    }
}

/// Build a VARIANT holding an i32.
pub fn variant_i32(val: i32) -> VARIANT {
    unsafe {
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_I4);
        ptr::write(&mut inner.Anonymous.lVal, val);
        v
    }
}

/// Build a VARIANT holding a BSTR copy of the string.
pub fn variant_str(val: &str) -> VARIANT {
    unsafe {
        let bstr = BSTR::from(val);
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_BSTR);
        ptr::write(&mut inner.Anonymous.bstrVal, ManuallyDrop::new(bstr));
        v
    }
}

/// Create the canonical "omitted parameter" VARIANT, used to skip optional
/// positional arguments (VT_ERROR with DISP_E_PARAMNOTFOUND).
pub fn variant_missing() -> VARIANT {
    unsafe {
        let mut v = VARIANT::default();
        let inner = &mut *v.Anonymous.Anonymous;
        ptr::write(&mut inner.vt, VT_ERROR);
        ptr::write(&mut inner.Anonymous.scode, DISP_E_PARAMNOTFOUND.0);
        v
    }
}

/// The VT discriminant of a VARIANT.
pub fn variant_vt(v: &VARIANT) -> u16 {
    unsafe { v.Anonymous.Anonymous.vt.0 }
}

/// Read a bool back out of a VARIANT.
pub fn variant_get_bool(v: &VARIANT) -> Option<bool> {
    unsafe {
        if v.Anonymous.Anonymous.vt == VT_BOOL {
            Some(v.Anonymous.Anonymous.Anonymous.boolVal.0 != 0)
        } else {
            None
        }
    }
}

/// Numeric VARIANTs (R8, R4, I4, I2) widened to f64.
pub fn variant_get_f64(v: &VARIANT) -> Option<f64> {
    unsafe {
        let vt = v.Anonymous.Anonymous.vt;
        let anon = &v.Anonymous.Anonymous.Anonymous;
        if vt == VT_R8 {
            Some(anon.dblVal)
        } else if vt == VT_R4 {
            Some(anon.fltVal as f64)
        } else if vt == VT_I4 {
            Some(anon.lVal as f64)
        } else if vt == VT_I2 {
            Some(anon.iVal as f64)
        } else {
            None
        }
    }
}

/// The string inside a VT_BSTR VARIANT.
pub fn variant_get_string(v: &VARIANT) -> Option<String> {
    unsafe {
        if v.Anonymous.Anonymous.vt == VT_BSTR {
            let bstr = &v.Anonymous.Anonymous.Anonymous.bstrVal;
            Some(bstr.to_string())
        } else {
            None
        }
    }
}

/// The object inside a VT_DISPATCH VARIANT.
pub fn variant_get_dispatch(v: &VARIANT) -> Option<IDispatch> {
    unsafe {
        if v.Anonymous.Anonymous.vt == VT_DISPATCH {
            // pdispVal nests Option<IDispatch> under ManuallyDrop
            let opt_disp: &Option<IDispatch> = &v.Anonymous.Anonymous.Anonymous.pdispVal;
            opt_disp.clone()
        } else {
            None
        }
    }
}

/// True for VT_EMPTY and VT_NULL.
pub fn variant_is_empty(v: &VARIANT) -> bool {
    unsafe {
        let vt = v.Anonymous.Anonymous.vt;
        vt == VT_EMPTY || vt == VT_NULL
    }
}

/// Extract the error code (scode) from a VT_ERROR VARIANT.
pub fn variant_get_error_code(v: &VARIANT) -> Option<i32> {
    unsafe {
        if v.Anonymous.Anonymous.vt == VT_ERROR {
            Some(v.Anonymous.Anonymous.Anonymous.scode)
        } else {
            None
        }
    }
}

/// Check if a VARIANT carries a SAFEARRAY.
pub fn variant_is_array(v: &VARIANT) -> bool {
    unsafe { (v.Anonymous.Anonymous.vt.0 & VT_ARRAY.0) != 0 }
}

/// Read a VARIANT's 2-D SAFEARRAY of VARIANTs into a row-major grid.
///
/// Excel returns bulk range values this way: dimension 1 is rows,
/// dimension 2 is columns, both 1-based. SafeArrayGetElement wants indices
/// right-most dimension first, so the index vector is `[col, row]`.
pub fn variant_to_grid(v: &VARIANT) -> Result<Vec<Vec<VARIANT>>, String> {
    unsafe {
        let vt = v.Anonymous.Anonymous.vt.0;
        if vt != (VT_ARRAY.0 | VT_VARIANT.0) {
            return Err(format!("VARIANT is not an array of VARIANTs (VT={vt})"));
        }
        let psa: *mut SAFEARRAY = v.Anonymous.Anonymous.Anonymous.parray;
        if psa.is_null() {
            return Err("array VARIANT holds a null SAFEARRAY".to_string());
        }

        let dims = SafeArrayGetDim(psa);
        if dims != 2 {
            return Err(format!("expected a 2-D range array, got {dims} dimension(s)"));
        }

        let row_lo = SafeArrayGetLBound(psa, 1).map_err(|e| format!("row lbound: {e}"))?;
        let row_hi = SafeArrayGetUBound(psa, 1).map_err(|e| format!("row ubound: {e}"))?;
        let col_lo = SafeArrayGetLBound(psa, 2).map_err(|e| format!("col lbound: {e}"))?;
        let col_hi = SafeArrayGetUBound(psa, 2).map_err(|e| format!("col ubound: {e}"))?;

        let mut grid = Vec::with_capacity((row_hi - row_lo + 1).max(0) as usize);
        for row in row_lo..=row_hi {
            let mut cells = Vec::with_capacity((col_hi - col_lo + 1).max(0) as usize);
            for col in col_lo..=col_hi {
                let indices = [col, row];
                let mut element = VARIANT::default();
                SafeArrayGetElement(
                    psa,
                    indices.as_ptr(),
                    &mut element as *mut VARIANT as *mut _,
                )
                .map_err(|e| format!("element ({row},{col}): {e}"))?;
                cells.push(element);
            }
            grid.push(cells);
        }
        Ok(grid)
    }
}

// -- DispatchObject --

/// An IDispatch handle with name-based property and method access.
#[derive(Clone)]
pub struct DispatchObject {
    inner: IDispatch,
}

impl DispatchObject {
    /// Attach to a running COM server registered in the running-object
    /// table, e.g. an Excel instance the user already has open. Returns
    /// `Ok(None)` when no instance is running.
    pub fn attach_from_progid(progid: &str) -> Result<Option<Self>, String> {
        unsafe {
            let hstr = HSTRING::from(progid);
            let clsid =
                CLSIDFromProgID(&hstr).map_err(|e| format!("CLSIDFromProgID failed: {e}"))?;
            let mut unknown: Option<IUnknown> = None;
            if GetActiveObject(&clsid, None, &mut unknown).is_err() {
                return Ok(None);
            }
            match unknown {
                Some(unk) => {
                    let disp: IDispatch = unk
                        .cast()
                        .map_err(|e| format!("active '{progid}' is not IDispatch: {e}"))?;
                    Ok(Some(Self { inner: disp }))
                }
                None => Ok(None),
            }
        }
    }

    /// Spin up a new COM server instance for a ProgID (e.g., "Excel.Application").
    pub fn create_from_progid(progid: &str) -> Result<Self, String> {
        unsafe {
            let hstr = HSTRING::from(progid);
            let clsid =
                CLSIDFromProgID(&hstr).map_err(|e| format!("CLSIDFromProgID failed: {e}"))?;
            let disp: IDispatch = CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER)
                .map_err(|e| format!("CoCreateInstance failed for '{progid}': {e}"))?;
            Ok(Self { inner: disp })
        }
    }

    /// Take ownership of an already-obtained IDispatch.
    pub fn from_idispatch(disp: IDispatch) -> Self {
        Self { inner: disp }
    }

    /// Resolve a member name to its DISPID.
    fn get_dispid(&self, name: &str) -> Result<i32, String> {
        unsafe {
            let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
            let pcwstr = PCWSTR(wide.as_ptr());
            let names = [pcwstr];
            let mut dispid = 0i32;
            self.inner
                .GetIDsOfNames(
                    &GUID::zeroed(),
                    names.as_ptr(),
                    1,
                    GetSystemDefaultLCID(),
                    &mut dispid,
                )
                .map_err(|e| format!("GetIDsOfNames('{name}') failed: {e}"))?;
            Ok(dispid)
        }
    }

    /// Read a property, VB's `obj.PropertyName`.
    pub fn get_property(&self, name: &str) -> Result<VARIANT, String> {
        let dispid = self.get_dispid(name)?;
        unsafe {
            let params = DISPPARAMS::default();
            let mut result = VARIANT::default();
            let mut except = EXCEPINFO::default();
            self.inner
                .Invoke(
                    dispid,
                    &GUID::zeroed(),
                    GetSystemDefaultLCID(),
                    DISPATCH_PROPERTYGET,
                    &params,
                    Some(&mut result),
                    Some(&mut except),
                    None,
                )
                .map_err(|e| format_invoke_error(e, &except, name))?;
            Ok(result)
        }
    }

    /// Write a property, VB's `obj.PropertyName = value`.
    pub fn set_property(&self, name: &str, value: VARIANT) -> Result<(), String> {
        let dispid = self.get_dispid(name)?;
        unsafe {
            let mut args = [value];
            let mut named_args = [DISPID_PROPERTYPUT];
            let params = DISPPARAMS {
                rgvarg: args.as_mut_ptr(),
                rgdispidNamedArgs: named_args.as_mut_ptr(),
                cArgs: 1,
                cNamedArgs: 1,
            };
            let mut except = EXCEPINFO::default();
            self.inner
                .Invoke(
                    dispid,
                    &GUID::zeroed(),
                    GetSystemDefaultLCID(),
                    DISPATCH_PROPERTYPUT,
                    &params,
                    None,
                    Some(&mut except),
                    None,
                )
                .map_err(|e| format_invoke_error(e, &except, name))?;
            Ok(())
        }
    }

    /// Call a method. Arguments go in natural order; they are flipped here
    /// into the right-to-left order DISPPARAMS expects.
    pub fn invoke_method(&self, name: &str, args: &[VARIANT]) -> Result<VARIANT, String> {
        let dispid = self.get_dispid(name)?;
        unsafe {
            let mut reversed: Vec<VARIANT> = args.iter().rev().cloned().collect();
            let params = DISPPARAMS {
                rgvarg: if reversed.is_empty() {
                    std::ptr::null_mut()
                } else {
                    reversed.as_mut_ptr()
                },
                rgdispidNamedArgs: std::ptr::null_mut(),
                cArgs: reversed.len() as u32,
                cNamedArgs: 0,
            };
            let mut result = VARIANT::default();
            let mut except = EXCEPINFO::default();
            self.inner
                .Invoke(
                    dispid,
                    &GUID::zeroed(),
                    GetSystemDefaultLCID(),
                    DISPATCH_METHOD,
                    &params,
                    Some(&mut result),
                    Some(&mut except),
                    None,
                )
                .map_err(|e| format_invoke_error(e, &except, name))?;
            Ok(result)
        }
    }

    /// A property whose value is itself an IDispatch object.
    pub fn get_child(&self, name: &str) -> Result<DispatchObject, String> {
        let variant = self.get_property(name)?;
        extract_dispatch(&variant, name)
    }

    /// Call a method whose return value is an IDispatch object.
    pub fn invoke_child(&self, name: &str, args: &[VARIANT]) -> Result<DispatchObject, String> {
        let variant = self.invoke_method(name, args)?;
        extract_dispatch(&variant, name)
    }

    /// Get an indexed property (e.g., `Item(1)`, `Range("A1")`, or
    /// `Cells(row, col)`). Indices are in natural order; DISPPARAMS wants
    /// them reversed, same as method arguments.
    pub fn get_indexed(&self, name: &str, indices: &[VARIANT]) -> Result<DispatchObject, String> {
        let dispid = self.get_dispid(name)?;
        unsafe {
            let mut reversed: Vec<VARIANT> = indices.iter().rev().cloned().collect();
            let params = DISPPARAMS {
                rgvarg: if reversed.is_empty() {
                    std::ptr::null_mut()
                } else {
                    reversed.as_mut_ptr()
                },
                rgdispidNamedArgs: std::ptr::null_mut(),
                cArgs: reversed.len() as u32,
                cNamedArgs: 0,
            };
            let mut result = VARIANT::default();
            let mut except = EXCEPINFO::default();
            self.inner
                .Invoke(
                    dispid,
                    &GUID::zeroed(),
                    GetSystemDefaultLCID(),
                    DISPATCH_PROPERTYGET,
                    &params,
                    Some(&mut result),
                    Some(&mut except),
                    None,
                )
                .map_err(|e| format_invoke_error(e, &except, name))?;
            extract_dispatch(&result, name)
        }
    }
}

/// Pull the IDispatch out of a VARIANT, or report what was there instead.
fn extract_dispatch(variant: &VARIANT, context: &str) -> Result<DispatchObject, String> {
    if let Some(disp) = variant_get_dispatch(variant) {
        Ok(DispatchObject::from_idispatch(disp))
    } else if variant_is_empty(variant) {
        Err(format!("'{context}' returned empty/null"))
    } else {
        let vt = variant_vt(variant);
        Err(format!(
            "'{context}' returned non-object VARIANT (VT={vt}), expected VT_DISPATCH"
        ))
    }
}

/// Render an Invoke failure, folding in EXCEPINFO details when present.
fn format_invoke_error(err: windows::core::Error, except: &EXCEPINFO, member_name: &str) -> String {
    let code = err.code().0 as u32;
    if code == DISP_E_EXCEPTION.0 as u32 {
        let desc = if !except.bstrDescription.is_empty() {
            except.bstrDescription.to_string()
        } else {
            String::from("(no description)")
        };
        let source = if !except.bstrSource.is_empty() {
            except.bstrSource.to_string()
        } else {
            String::from("(no source)")
        };
        format!("COM exception in '{member_name}': {desc} (source: {source})")
    } else {
        format!("Invoke('{member_name}') failed: {err}")
    }
}
