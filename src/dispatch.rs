//! Maps a bound [`crate::bindings::Action`] + [`crate::bindings::Arg`] pair to the user-action
//! function it invokes (§4.5, §4.6 key/button tables).

use crate::bindings::{Action, Arg};
use crate::state::WmState;
use crate::x::XConn;

/// Invoke the action bound to a key or button press.
pub fn run_action(state: &mut WmState, conn: &mut dyn XConn, action: Action, arg: Arg) {
    match action {
        Action::View => {
            if let Arg::Tags(m) = arg {
                crate::actions::view(state, conn, m);
            }
        }
        Action::ToggleView => {
            if let Arg::Tags(m) = arg {
                crate::actions::toggleview(state, conn, m);
            }
        }
        Action::Tag => {
            if let Arg::Tags(m) = arg {
                crate::actions::tag(state, conn, m);
            }
        }
        Action::ToggleTag => {
            if let Arg::Tags(m) = arg {
                crate::actions::toggletag(state, conn, m);
            }
        }
        Action::FocusMon => {
            if let Arg::Int(d) = arg {
                crate::actions::focusmon(state, conn, d);
            }
        }
        Action::TagMon => {
            if let Arg::Int(d) = arg {
                crate::actions::tagmon(state, conn, d);
            }
        }
        Action::FocusStack => {
            if let Arg::Int(d) = arg {
                crate::actions::focusstack(state, conn, d);
            }
        }
        Action::IncNMaster => {
            if let Arg::Int(d) = arg {
                crate::actions::incnmaster(state, conn, d);
            }
        }
        Action::SetMFact => {
            if let Arg::Float(f) = arg {
                crate::actions::setmfact(state, conn, f);
            }
        }
        Action::SetLayout => {
            let layout = match arg {
                Arg::Int(i) if i >= 0 => state.config.layouts.get(i as usize).cloned(),
                _ => None,
            };
            crate::actions::setlayout(state, conn, layout);
        }
        Action::Zoom => crate::actions::zoom(state, conn),
        Action::ToggleFloating => crate::actions::togglefloating(state, conn),
        Action::ToggleBar => crate::actions::togglebar(state, conn),
        Action::KillClient => crate::actions::killclient(state, conn),
        Action::Quit => crate::actions::quit(state),
        Action::Spawn => {
            let mut argv = state.config.dmenucmd.clone();
            if let Some(slot) = argv.get_mut(state.config.dmenumon) {
                *slot = state.monitor(state.selected_monitor()).num.to_string();
            }
            let _ = crate::actions::spawn(&argv);
        }
        Action::MoveMouse => crate::actions::movemouse(state, conn),
        Action::ResizeMouse => crate::actions::resizemouse(state, conn),
    }
}
