use std::fmt;

/// Remote operations of the actor, used to count calls and inject failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(missing_docs)]
pub enum Operation {
    GetCallerProfile,
    GetProfile,
    SaveCallerProfile,
    FetchAllMusicians,
    FetchMusiciansByLocation,
    FetchAllGigs,
    FetchGigsByVenue,
    FetchGigsByMusician,
    BookGig,
    VerifyGig,
    UploadContract,
    FetchSlotsByMusician,
    CreateSlot,
    UpdateSlotAvailability,
    GetWalletState,
    IsCallerAdmin,
    GetAnalyticsSummary,
    GetUsageEvents,
    RecordUsageEvent,
}

impl Operation {
    /// Remote method name.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::GetCallerProfile => "getCallerUserProfile",
            Self::GetProfile => "getUserProfile",
            Self::SaveCallerProfile => "saveCallerUserProfile",
            Self::FetchAllMusicians => "fetchAllMusicians",
            Self::FetchMusiciansByLocation => "fetchMusiciansByLocation",
            Self::FetchAllGigs => "fetchAllGigs",
            Self::FetchGigsByVenue => "fetchGigsByVenue",
            Self::FetchGigsByMusician => "fetchGigsByMusician",
            Self::BookGig => "bookGig",
            Self::VerifyGig => "verifyGig",
            Self::UploadContract => "uploadContract",
            Self::FetchSlotsByMusician => "fetchSlotsByMusician",
            Self::CreateSlot => "createSlot",
            Self::UpdateSlotAvailability => "updateSlotAvailability",
            Self::GetWalletState => "getWalletState",
            Self::IsCallerAdmin => "isCallerAdmin",
            Self::GetAnalyticsSummary => "getAnalyticsSummary",
            Self::GetUsageEvents => "getUsageEvents",
            Self::RecordUsageEvent => "recordUsageEvent",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}
