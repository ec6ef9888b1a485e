//! IRC numeric reply codes interpreted by the client.
//!
//! Only the replies the dispatcher acts on are named here. Every other
//! numeric travels as [`Command::Numeric`](crate::Command::Numeric) and is
//! rendered as a generic logged event.
//!
//! # Reference
//! - RFC 2812 Section 5: Replies

#![allow(non_camel_case_types)]

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 301 - User is away
    RPL_AWAY = 301,
    /// 353 - NAMES reply
    RPL_NAMREPLY = 353,
    /// 366 - End of NAMES list
    RPL_ENDOFNAMES = 366,
    /// 372 - MOTD line
    RPL_MOTD = 372,
    /// 376 - End of MOTD
    RPL_ENDOFMOTD = 376,
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
}

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        Some(match code {
            1 => Response::RPL_WELCOME,
            301 => Response::RPL_AWAY,
            353 => Response::RPL_NAMREPLY,
            366 => Response::RPL_ENDOFNAMES,
            372 => Response::RPL_MOTD,
            376 => Response::RPL_ENDOFMOTD,
            401 => Response::ERR_NOSUCHNICK,
            _ => return None,
        })
    }

    /// Check if this is an error response (4xx, 5xx)
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }
}
