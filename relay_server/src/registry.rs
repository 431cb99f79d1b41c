use crate::error::RelayError;
use proto::Role;
use std::collections::HashMap;

/// Relay-assigned connection id
pub type ConnId = u64;

/// Host slot is filled for as long as the room exists
#[derive(Debug, Clone, Copy)]
struct Room {
    host: ConnId,
    client: Option<ConnId>,
}

impl Room {
    fn role_of(&self, conn: ConnId) -> Option<Role> {
        if self.host == conn {
            Some(Role::Host)
        } else if self.client == Some(conn) {
            Some(Role::Client)
        } else {
            None
        }
    }

    fn peer_of(&self, conn: ConnId) -> Option<ConnId> {
        match self.role_of(conn)? {
            Role::Host => self.client,
            Role::Client => Some(self.host),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub role: Role,
    /// The host, when this join filled the room
    pub peer: Option<ConnId>,
    /// Same connection joined the same room again
    pub rejoined: bool,
    /// Connection switched rooms and left this one first
    pub left: Option<LeaveOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    NotInRoom,
    ClientLeft {
        room_id: String,
        host: ConnId,
    },
    /// `promoted` is `None` when the room was destroyed
    HostLeft {
        room_id: String,
        promoted: Option<ConnId>,
    },
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    membership: HashMap<ConnId, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, conn: ConnId, room_id: &str) -> Result<JoinOutcome, RelayError> {
        if let Some(role) = self.rooms.get(room_id).and_then(|room| room.role_of(conn)) {
            return Ok(JoinOutcome {
                role,
                peer: None,
                rejoined: true,
                left: None,
            });
        }

        // Rejected joins leave the connection where it was
        if let Some(room) = self.rooms.get(room_id) {
            if room.client.is_some() {
                return Err(RelayError::RoomFull(room_id.to_string()));
            }
        }

        let left = match self.membership.contains_key(&conn) {
            true => Some(self.leave(conn)),
            false => None,
        };

        let outcome = match self.rooms.get_mut(room_id) {
            Some(room) => {
                room.client = Some(conn);
                JoinOutcome {
                    role: Role::Client,
                    peer: Some(room.host),
                    rejoined: false,
                    left,
                }
            }
            None => {
                self.rooms.insert(
                    room_id.to_string(),
                    Room {
                        host: conn,
                        client: None,
                    },
                );
                JoinOutcome {
                    role: Role::Host,
                    peer: None,
                    rejoined: false,
                    left,
                }
            }
        };

        self.membership.insert(conn, room_id.to_string());
        Ok(outcome)
    }

    pub fn leave(&mut self, conn: ConnId) -> LeaveOutcome {
        let Some(room_id) = self.membership.remove(&conn) else {
            return LeaveOutcome::NotInRoom;
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return LeaveOutcome::NotInRoom;
        };

        match room.role_of(conn) {
            Some(Role::Client) => {
                room.client = None;
                LeaveOutcome::ClientLeft {
                    host: room.host,
                    room_id,
                }
            }
            Some(Role::Host) => match room.client.take() {
                Some(client) => {
                    room.host = client;
                    LeaveOutcome::HostLeft {
                        room_id,
                        promoted: Some(client),
                    }
                }
                None => {
                    self.rooms.remove(&room_id);
                    LeaveOutcome::HostLeft {
                        room_id,
                        promoted: None,
                    }
                }
            },
            None => LeaveOutcome::NotInRoom,
        }
    }

    pub fn peer_of(&self, conn: ConnId) -> Option<ConnId> {
        let room_id = self.membership.get(&conn)?;
        self.rooms.get(room_id)?.peer_of(conn)
    }

    pub fn room_of(&self, conn: ConnId) -> Option<&str> {
        self.membership.get(&conn).map(String::as_str)
    }

    pub fn role_of(&self, conn: ConnId) -> Option<Role> {
        let room_id = self.membership.get(&conn)?;
        self.rooms.get(room_id)?.role_of(conn)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
