//! In-process store
//!
//! Implements every store trait over one mutex-guarded dataset. Each trait
//! method takes the lock once, so multi-row checks (slot uniqueness, the scan
//! window) are atomic exactly like their Postgres counterparts.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::database::store::{
    BookingStore, CourtStore, EmailLogStore, GroupStore, ScanStore, UserStore,
};
use crate::models::{
    Booking, BookingDetails, Court, CreateGroupRequest, EmailLog, Group, GroupMember,
    GroupMemberDetails, GroupRole, NewEmailLog, NewScan, NewUser, PlayerSummary, ScanEvent,
    SlotKey, UpdateProfileRequest, User, UserRole,
};
use crate::utils::errors::{CourtsideError, Result};

#[derive(Debug)]
struct StoredBooking {
    booking: Booking,
    invited: Vec<i64>,
}

#[derive(Debug, Default)]
struct Sequences {
    user: i64,
    booking: i64,
    scan: i64,
    group: i64,
    member: i64,
    email_log: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug)]
struct MemoryData {
    seq: Sequences,
    users: BTreeMap<i64, User>,
    courts: Vec<Court>,
    bookings: BTreeMap<i64, StoredBooking>,
    scans: Vec<ScanEvent>,
    groups: BTreeMap<i64, Group>,
    members: Vec<GroupMember>,
    email_logs: Vec<EmailLog>,
}

impl MemoryData {
    fn user_summary(&self, id: i64) -> Result<PlayerSummary> {
        self.users
            .get(&id)
            .map(User::summary)
            .ok_or_else(|| CourtsideError::not_found("User", id))
    }

    fn details(&self, stored: &StoredBooking) -> Result<BookingDetails> {
        let booking = &stored.booking;
        let court = self
            .courts
            .iter()
            .find(|c| c.id == booking.court_id)
            .ok_or_else(|| CourtsideError::not_found("Court", booking.court_id))?;
        let hour = u32::try_from(booking.start_hour)
            .map_err(|_| CourtsideError::InvalidSlotKey(format!("stored hour {}", booking.start_hour)))?;
        let slot_key = SlotKey::new(booking.court_id, booking.booking_date, hour)?;
        let invited_players = stored
            .invited
            .iter()
            .map(|id| self.user_summary(*id))
            .collect::<Result<Vec<_>>>()?;

        Ok(BookingDetails {
            id: booking.id,
            court_id: booking.court_id,
            court_name: court.name.clone(),
            date: booking.booking_date,
            time: slot_key.time_label(),
            slot_key,
            owner: self.user_summary(booking.owner_id)?,
            invited_players,
            created_at: booking.created_at,
        })
    }

    fn slot_taken(&self, slot: &SlotKey) -> bool {
        self.bookings.values().any(|stored| {
            stored.booking.court_id == slot.court_id
                && stored.booking.booking_date == slot.date
                && stored.booking.start_hour == slot.hour as i32
        })
    }

    fn user_mut(&mut self, id: i64) -> Result<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| CourtsideError::not_found("User", id))
    }
}

/// Mutex-guarded store selected with a `memory://` database URL
#[derive(Debug)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with the four default courts
    pub fn new() -> Self {
        Self {
            data: Mutex::new(MemoryData {
                seq: Sequences::default(),
                users: BTreeMap::new(),
                courts: Court::default_courts(),
                bookings: BTreeMap::new(),
                scans: Vec::new(),
                groups: BTreeMap::new(),
                members: Vec::new(),
                email_logs: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut data = self.lock();
        if data.users.values().any(|u| u.email == user.email) {
            return Err(CourtsideError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }

        let now = Utc::now();
        let id = next(&mut data.seq.user);
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            address: user.address,
            avatar_url: None,
            role: user.role,
            email_verified: false,
            renewal_date: user.renewal_date,
            qr_code: None,
            created_at: now,
            updated_at: now,
        };
        data.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_qr_code(&self, code: &str) -> Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.qr_code.as_deref() == Some(code))
            .cloned())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>> {
        let data = self.lock();
        Ok(ids.iter().filter_map(|id| data.users.get(id).cloned()).collect())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let data = self.lock();
        let mut users: Vec<User> = data.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<User>> {
        let data = self.lock();
        let mut users: Vec<User> = data
            .users
            .values()
            .filter(|u| u.email_verified)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update_profile(&self, id: i64, update: UpdateProfileRequest) -> Result<User> {
        let mut data = self.lock();
        let user = data.user_mut(id)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(address) = update.address {
            user.address = Some(address);
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        let mut data = self.lock();
        let user = data.user_mut(id)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn activate(&self, id: i64, renewal_date: NaiveDate) -> Result<User> {
        let mut data = self.lock();
        let user = data.user_mut(id)?;
        user.email_verified = true;
        user.renewal_date = renewal_date;
        if user.role == UserRole::User {
            user.role = UserRole::Member;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_qr_code_if_absent(&self, id: i64, code: &str) -> Result<bool> {
        let mut data = self.lock();
        if data.users.values().any(|u| u.qr_code.as_deref() == Some(code)) {
            return Err(CourtsideError::Conflict("QR code collision".to_string()));
        }
        let user = data.user_mut(id)?;
        if user.qr_code.is_some() {
            return Ok(false);
        }
        user.qr_code = Some(code.to_string());
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.lock().users.len() as i64)
    }

    async fn count_active(&self) -> Result<i64> {
        Ok(self.lock().users.values().filter(|u| u.email_verified).count() as i64)
    }
}

#[async_trait]
impl CourtStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Court>> {
        Ok(self.lock().courts.clone())
    }

    async fn find(&self, id: i32) -> Result<Option<Court>> {
        Ok(self.lock().courts.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create_all(
        &self,
        owner_id: i64,
        slots: &[SlotKey],
        invited: &[i64],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<BookingDetails>> {
        let mut data = self.lock();

        // Validate everything before the first insert so a failure leaves no trace
        data.user_summary(owner_id)?;
        for id in invited {
            data.user_summary(*id)?;
        }
        for (i, slot) in slots.iter().enumerate() {
            if data.slot_taken(slot) || slots[..i].contains(slot) {
                return Err(CourtsideError::SlotUnavailable(format!("{} is already booked", slot)));
            }
            if !data.courts.iter().any(|c| c.id == slot.court_id) {
                return Err(CourtsideError::not_found("Court", slot.court_id));
            }
        }

        let mut ids = Vec::with_capacity(slots.len());
        for slot in slots {
            let id = next(&mut data.seq.booking);
            data.bookings.insert(
                id,
                StoredBooking {
                    booking: Booking {
                        id,
                        court_id: slot.court_id,
                        booking_date: slot.date,
                        start_hour: slot.hour as i32,
                        owner_id,
                        created_at,
                    },
                    invited: invited.to_vec(),
                },
            );
            ids.push(id);
        }

        let mut created = ids
            .iter()
            .filter_map(|id| data.bookings.get(id))
            .map(|stored| data.details(stored))
            .collect::<Result<Vec<_>>>()?;
        created.sort_by_key(|b| (b.date, b.slot_key.hour));
        Ok(created)
    }

    async fn for_court_on(&self, court_id: i32, date: NaiveDate) -> Result<Vec<BookingDetails>> {
        let data = self.lock();
        let mut bookings = data
            .bookings
            .values()
            .filter(|s| s.booking.court_id == court_id && s.booking.booking_date == date)
            .map(|s| data.details(s))
            .collect::<Result<Vec<_>>>()?;
        bookings.sort_by_key(|b| b.slot_key.hour);
        Ok(bookings)
    }

    async fn for_user(
        &self,
        user_id: i64,
        from: NaiveDate,
        until: Option<NaiveDate>,
    ) -> Result<Vec<BookingDetails>> {
        let data = self.lock();
        let mut bookings = data
            .bookings
            .values()
            .filter(|s| s.booking.owner_id == user_id || s.invited.contains(&user_id))
            .filter(|s| s.booking.booking_date >= from)
            .filter(|s| until.map_or(true, |until| s.booking.booking_date <= until))
            .map(|s| data.details(s))
            .collect::<Result<Vec<_>>>()?;
        bookings.sort_by_key(|b| (b.date, b.slot_key.hour, b.court_id));
        Ok(bookings)
    }

    async fn find(&self, id: i64) -> Result<Option<BookingDetails>> {
        let data = self.lock();
        data.bookings.get(&id).map(|s| data.details(s)).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.lock().bookings.remove(&id).is_some())
    }

    async fn count_on(&self, date: NaiveDate) -> Result<i64> {
        Ok(self
            .lock()
            .bookings
            .values()
            .filter(|s| s.booking.booking_date == date)
            .count() as i64)
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn record_unless_recent(
        &self,
        scan: NewScan,
        window_start: DateTime<Utc>,
    ) -> Result<Option<ScanEvent>> {
        let mut data = self.lock();
        let duplicate = data
            .scans
            .iter()
            .any(|s| s.user_id == scan.user_id && s.scanned_at > window_start);
        if duplicate {
            return Ok(None);
        }

        let event = ScanEvent {
            id: next(&mut data.seq.scan),
            user_id: scan.user_id,
            scanned_by: scan.scanned_by,
            location: scan.location,
            device: scan.device,
            scanned_at: scan.scanned_at,
        };
        data.scans.push(event.clone());
        Ok(Some(event))
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ScanEvent>> {
        let data = self.lock();
        let mut scans = data.scans.clone();
        scans.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at).then(b.id.cmp(&a.id)));
        scans.truncate(limit.max(0) as usize);
        Ok(scans)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<i64> {
        Ok(self.lock().scans.iter().filter(|s| s.scanned_at > since).count() as i64)
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn create(&self, owner_id: i64, request: CreateGroupRequest) -> Result<Group> {
        let mut data = self.lock();
        data.user_summary(owner_id)?;

        let now = Utc::now();
        let group = Group {
            id: next(&mut data.seq.group),
            name: request.name,
            description: request.description,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        let member = GroupMember {
            id: next(&mut data.seq.member),
            group_id: group.id,
            user_id: owner_id,
            role: GroupRole::Owner,
            joined_at: now,
        };
        data.groups.insert(group.id, group.clone());
        data.members.push(member);
        Ok(group)
    }

    async fn find(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.lock().groups.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Group>> {
        let data = self.lock();
        let mut groups: Vec<Group> = data
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| data.groups.get(&m.group_id).cloned())
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn membership(&self, group_id: i64, user_id: i64) -> Result<Option<GroupMember>> {
        Ok(self
            .lock()
            .members
            .iter()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }

    async fn members(&self, group_id: i64) -> Result<Vec<GroupMemberDetails>> {
        let data = self.lock();
        data.members
            .iter()
            .filter(|m| m.group_id == group_id)
            .map(|m| {
                let user = data
                    .users
                    .get(&m.user_id)
                    .ok_or_else(|| CourtsideError::not_found("User", m.user_id))?;
                Ok(GroupMemberDetails {
                    user_id: user.id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                    avatar_url: user.avatar_url.clone(),
                    role: m.role,
                    joined_at: m.joined_at,
                })
            })
            .collect()
    }

    async fn add_member(&self, group_id: i64, user_id: i64, role: GroupRole) -> Result<GroupMember> {
        let mut data = self.lock();
        if !data.groups.contains_key(&group_id) {
            return Err(CourtsideError::not_found("Group", group_id));
        }
        data.user_summary(user_id)?;
        if data.members.iter().any(|m| m.group_id == group_id && m.user_id == user_id) {
            return Err(CourtsideError::Conflict(format!(
                "User {} is already a member of this group",
                user_id
            )));
        }

        let member = GroupMember {
            id: next(&mut data.seq.member),
            group_id,
            user_id,
            role,
            joined_at: Utc::now(),
        };
        data.members.push(member.clone());
        Ok(member)
    }

    async fn remove_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let mut data = self.lock();
        let before = data.members.len();
        data.members.retain(|m| !(m.group_id == group_id && m.user_id == user_id));
        Ok(data.members.len() != before)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut data = self.lock();
        if data.groups.remove(&id).is_none() {
            return Ok(false);
        }
        data.members.retain(|m| m.group_id != id);
        Ok(true)
    }
}

#[async_trait]
impl EmailLogStore for MemoryStore {
    async fn append(&self, entry: NewEmailLog) -> Result<EmailLog> {
        let mut data = self.lock();
        let log = EmailLog {
            id: next(&mut data.seq.email_log),
            subject: entry.subject,
            template: entry.template,
            content: entry.content,
            recipient_count: entry.recipient_count,
            sender_id: entry.sender_id,
            sent_at: entry.sent_at,
        };
        data.email_logs.push(log.clone());
        Ok(log)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<EmailLog>> {
        let data = self.lock();
        let mut logs = data.email_logs.clone();
        logs.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        logs.truncate(limit.max(0) as usize);
        Ok(logs)
    }
}
