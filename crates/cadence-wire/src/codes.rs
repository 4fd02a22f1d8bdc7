//! HCI and BlueNRG vendor code tables
//!
//! Vendor ecodes are 16 bits: a 6-bit event group id (upper bits) and a
//! 10-bit event id. Names are only used for diagnostics.

/// HCI event codes
pub mod evt {
    pub const CONN_COMPLETE: u8 = 0x03;
    pub const DISCONN_COMPLETE: u8 = 0x05;
    pub const ENCRYPT_CHANGE: u8 = 0x08;
    pub const READ_REMOTE_VERSION_COMPLETE: u8 = 0x0C;
    pub const CMD_COMPLETE: u8 = 0x0E;
    pub const CMD_STATUS: u8 = 0x0F;
    pub const HARDWARE_ERROR: u8 = 0x10;
    pub const NUM_COMP_PKTS: u8 = 0x13;
    pub const DATA_BUFFER_OVERFLOW: u8 = 0x1A;
    pub const ENCRYPTION_KEY_REFRESH_COMPLETE: u8 = 0x30;
    pub const LE_META_EVENT: u8 = 0x3E;
    pub const VENDOR: u8 = 0xFF;

    pub fn name(code: u8) -> Option<&'static str> {
        Some(match code {
            CONN_COMPLETE => "EVT_CONN_COMPLETE",
            DISCONN_COMPLETE => "EVT_DISCONN_COMPLETE",
            ENCRYPT_CHANGE => "EVT_ENCRYPT_CHANGE",
            READ_REMOTE_VERSION_COMPLETE => "EVT_READ_REMOTE_VERSION_COMPLETE",
            CMD_COMPLETE => "EVT_CMD_COMPLETE",
            CMD_STATUS => "EVT_CMD_STATUS",
            HARDWARE_ERROR => "EVT_HARDWARE_ERROR",
            NUM_COMP_PKTS => "EVT_NUM_COMP_PKTS",
            DATA_BUFFER_OVERFLOW => "EVT_DATA_BUFFER_OVERFLOW",
            ENCRYPTION_KEY_REFRESH_COMPLETE => "EVT_ENCRYPTION_KEY_REFRESH_COMPLETE",
            LE_META_EVENT => "EVT_LE_META_EVENT",
            VENDOR => "EVT_VENDOR",
            _ => return None,
        })
    }
}

/// LE meta sub-events
pub mod le {
    pub const CONN_COMPLETE: u8 = 0x01;
    pub const ADVERTISING_REPORT: u8 = 0x02;
    pub const CONN_UPDATE_COMPLETE: u8 = 0x03;
    pub const READ_REMOTE_USED_FEATURES_COMPLETE: u8 = 0x04;
    pub const LTK_REQUEST: u8 = 0x05;

    pub fn name(sub_event: u8) -> Option<&'static str> {
        Some(match sub_event {
            CONN_COMPLETE => "EVT_LE_CONN_COMPLETE",
            ADVERTISING_REPORT => "EVT_LE_ADVERTISING_REPORT",
            CONN_UPDATE_COMPLETE => "EVT_LE_CONN_UPDATE_COMPLETE",
            READ_REMOTE_USED_FEATURES_COMPLETE => "EVT_LE_READ_REMOTE_USED_FEATURES_COMPLETE",
            LTK_REQUEST => "EVT_LE_LTK_REQUEST",
            _ => return None,
        })
    }
}

/// Vendor ecodes
pub mod vendor {
    // HAL group
    pub const HAL_INITIALIZED: u16 = 0x0001;
    pub const HAL_EVENTS_LOST: u16 = 0x0002;
    pub const HAL_CRASH_INFO: u16 = 0x0003;

    // GAP group
    pub const GAP_LIMITED_DISCOVERABLE: u16 = 0x0400;
    pub const GAP_PAIRING_CMPLT: u16 = 0x0401;
    pub const GAP_PASS_KEY_REQUEST: u16 = 0x0402;
    pub const GAP_AUTHORIZATION_REQUEST: u16 = 0x0403;
    pub const GAP_SLAVE_SECURITY_INITIATED: u16 = 0x0404;
    pub const GAP_BOND_LOST: u16 = 0x0405;
    pub const GAP_DEVICE_FOUND: u16 = 0x0406;
    pub const GAP_PROCEDURE_COMPLETE: u16 = 0x0407;
    pub const GAP_ADDR_NOT_RESOLVED: u16 = 0x0408;

    // L2CAP group
    pub const L2CAP_CONN_UPD_RESP: u16 = 0x0800;
    pub const L2CAP_PROCEDURE_TIMEOUT: u16 = 0x0801;
    pub const L2CAP_CONN_UPD_REQ: u16 = 0x0802;

    // GATT group
    pub const GATT_ATTRIBUTE_MODIFIED: u16 = 0x0C01;
    pub const GATT_PROCEDURE_TIMEOUT: u16 = 0x0C02;
    pub const ATT_EXCHANGE_MTU_RESP: u16 = 0x0C03;
    pub const ATT_FIND_INFORMATION_RESP: u16 = 0x0C04;
    pub const ATT_FIND_BY_TYPE_VAL_RESP: u16 = 0x0C05;
    pub const ATT_READ_BY_TYPE_RESP: u16 = 0x0C06;
    pub const ATT_READ_RESP: u16 = 0x0C07;
    pub const ATT_READ_BLOB_RESP: u16 = 0x0C08;
    pub const ATT_READ_MULTIPLE_RESP: u16 = 0x0C09;
    pub const ATT_READ_BY_GROUP_TYPE_RESP: u16 = 0x0C0A;
    pub const ATT_PREPARE_WRITE_RESP: u16 = 0x0C0C;
    pub const ATT_EXEC_WRITE_RESP: u16 = 0x0C0D;
    pub const GATT_INDICATION: u16 = 0x0C0E;
    pub const GATT_NOTIFICATION: u16 = 0x0C0F;
    pub const GATT_PROCEDURE_COMPLETE: u16 = 0x0C10;
    pub const GATT_ERROR_RESP: u16 = 0x0C11;
    pub const GATT_DISC_READ_CHAR_BY_UUID_RESP: u16 = 0x0C12;
    pub const GATT_WRITE_PERMIT_REQ: u16 = 0x0C13;
    pub const GATT_READ_PERMIT_REQ: u16 = 0x0C14;
    pub const GATT_READ_MULTI_PERMIT_REQ: u16 = 0x0C15;
    pub const GATT_TX_POOL_AVAILABLE: u16 = 0x0C16;
    pub const GATT_SERVER_CONFIRMATION: u16 = 0x0C17;
    pub const GATT_PREPARE_WRITE_PERMIT_REQ: u16 = 0x0C18;

    /// Event group id (upper 6 bits)
    #[inline]
    pub fn group(ecode: u16) -> u8 {
        (ecode >> 10) as u8
    }

    /// Event id within the group (lower 10 bits)
    #[inline]
    pub fn id(ecode: u16) -> u16 {
        ecode & 0x03FF
    }

    pub fn group_name(ecode: u16) -> &'static str {
        match group(ecode) {
            0 => "HAL",
            1 => "GAP",
            2 => "L2CAP",
            3 => "GATT",
            _ => "UNKNOWN",
        }
    }

    pub fn name(ecode: u16) -> Option<&'static str> {
        Some(match ecode {
            HAL_INITIALIZED => "EVT_BLUE_HAL_INITIALIZED",
            HAL_EVENTS_LOST => "EVT_BLUE_HAL_EVENTS_LOST",
            HAL_CRASH_INFO => "EVT_BLUE_HAL_CRASH_INFO",
            GAP_LIMITED_DISCOVERABLE => "EVT_BLUE_GAP_LIMITED_DISCOVERABLE",
            GAP_PAIRING_CMPLT => "EVT_BLUE_GAP_PAIRING_CMPLT",
            GAP_PASS_KEY_REQUEST => "EVT_BLUE_GAP_PASS_KEY_REQUEST",
            GAP_AUTHORIZATION_REQUEST => "EVT_BLUE_GAP_AUTHORIZATION_REQUEST",
            GAP_SLAVE_SECURITY_INITIATED => "EVT_BLUE_GAP_SLAVE_SECURITY_INITIATED",
            GAP_BOND_LOST => "EVT_BLUE_GAP_BOND_LOST",
            GAP_DEVICE_FOUND => "EVT_BLUE_GAP_DEVICE_FOUND",
            GAP_PROCEDURE_COMPLETE => "EVT_BLUE_GAP_PROCEDURE_COMPLETE",
            GAP_ADDR_NOT_RESOLVED => "EVT_BLUE_GAP_ADDR_NOT_RESOLVED",
            L2CAP_CONN_UPD_RESP => "EVT_BLUE_L2CAP_CONN_UPD_RESP",
            L2CAP_PROCEDURE_TIMEOUT => "EVT_BLUE_L2CAP_PROCEDURE_TIMEOUT",
            L2CAP_CONN_UPD_REQ => "EVT_BLUE_L2CAP_CONN_UPD_REQ",
            GATT_ATTRIBUTE_MODIFIED => "EVT_BLUE_GATT_ATTRIBUTE_MODIFIED",
            GATT_PROCEDURE_TIMEOUT => "EVT_BLUE_GATT_PROCEDURE_TIMEOUT",
            ATT_EXCHANGE_MTU_RESP => "EVT_BLUE_ATT_EXCHANGE_MTU_RESP",
            ATT_FIND_INFORMATION_RESP => "EVT_BLUE_ATT_FIND_INFORMATION_RESP",
            ATT_FIND_BY_TYPE_VAL_RESP => "EVT_BLUE_ATT_FIND_BY_TYPE_VAL_RESP",
            ATT_READ_BY_TYPE_RESP => "EVT_BLUE_ATT_READ_BY_TYPE_RESP",
            ATT_READ_RESP => "EVT_BLUE_ATT_READ_RESP",
            ATT_READ_BLOB_RESP => "EVT_BLUE_ATT_READ_BLOB_RESP",
            ATT_READ_MULTIPLE_RESP => "EVT_BLUE_ATT_READ_MULTIPLE_RESP",
            ATT_READ_BY_GROUP_TYPE_RESP => "EVT_BLUE_ATT_READ_BY_GROUP_TYPE_RESP",
            ATT_PREPARE_WRITE_RESP => "EVT_BLUE_ATT_PREPARE_WRITE_RESP",
            ATT_EXEC_WRITE_RESP => "EVT_BLUE_ATT_EXEC_WRITE_RESP",
            GATT_INDICATION => "EVT_BLUE_GATT_INDICATION",
            GATT_NOTIFICATION => "EVT_BLUE_GATT_NOTIFICATION",
            GATT_PROCEDURE_COMPLETE => "EVT_BLUE_GATT_PROCEDURE_COMPLETE",
            GATT_ERROR_RESP => "EVT_BLUE_GATT_ERROR_RESP",
            GATT_DISC_READ_CHAR_BY_UUID_RESP => "EVT_BLUE_GATT_DISC_READ_CHAR_BY_UUID_RESP",
            GATT_WRITE_PERMIT_REQ => "EVT_BLUE_GATT_WRITE_PERMIT_REQ",
            GATT_READ_PERMIT_REQ => "EVT_BLUE_GATT_READ_PERMIT_REQ",
            GATT_READ_MULTI_PERMIT_REQ => "EVT_BLUE_GATT_READ_MULTI_PERMIT_REQ",
            GATT_TX_POOL_AVAILABLE => "EVT_BLUE_GATT_TX_POOL_AVAILABLE",
            GATT_SERVER_CONFIRMATION => "EVT_BLUE_GATT_SERVER_CONFIRMATION",
            GATT_PREPARE_WRITE_PERMIT_REQ => "EVT_BLUE_GATT_PREPARE_WRITE_PERMIT_REQ",
            _ => return None,
        })
    }
}

/// Reset reasons reported by the HAL initialized event
pub mod reset {
    pub const NORMAL: u8 = 0x01;
    pub const UPDATER_ACI: u8 = 0x02;
    pub const UPDATER_BAD_FLAG: u8 = 0x03;
    pub const UPDATER_PIN: u8 = 0x04;
    pub const WATCHDOG: u8 = 0x05;
    pub const LOCKUP: u8 = 0x06;
    pub const BROWNOUT: u8 = 0x07;
    pub const CRASH: u8 = 0x08;
    pub const ECC_ERR: u8 = 0x09;

    pub fn describe(reason: u8) -> Option<&'static str> {
        Some(match reason {
            NORMAL => "Normal startup",
            UPDATER_ACI => "Updater mode entered with ACI command",
            UPDATER_BAD_FLAG => "Updater mode entered due to a bad BLUE flag",
            UPDATER_PIN => "Updater mode entered with IRQ pin",
            WATCHDOG => "Reset caused by watchdog",
            LOCKUP => "Reset due to lockup",
            BROWNOUT => "Brownout reset",
            CRASH => "Reset caused by a crash (NMI or Hard Fault)",
            ECC_ERR => "Reset caused by an ECC error",
            _ => return None,
        })
    }

    /// Is this reset the result of a fault rather than a deliberate start?
    pub fn is_fault(reason: u8) -> bool {
        matches!(reason, UPDATER_BAD_FLAG | WATCHDOG | LOCKUP | BROWNOUT | CRASH | ECC_ERR)
    }
}

/// GAP procedure codes reported by the procedure complete event
pub mod procedure {
    pub const LIMITED_DISCOVERY: u8 = 0x01;
    pub const GENERAL_DISCOVERY: u8 = 0x02;
    pub const NAME_DISCOVERY: u8 = 0x04;
    pub const AUTO_CONNECTION_ESTABLISHMENT: u8 = 0x08;
    pub const GENERAL_CONNECTION_ESTABLISHMENT: u8 = 0x10;
    pub const SELECTIVE_CONNECTION_ESTABLISHMENT: u8 = 0x20;
    pub const DIRECT_CONNECTION_ESTABLISHMENT: u8 = 0x40;
    pub const OBSERVATION: u8 = 0x80;

    pub fn name(code: u8) -> Option<&'static str> {
        Some(match code {
            LIMITED_DISCOVERY => "GAP_LIMITED_DISCOVERY_PROC",
            GENERAL_DISCOVERY => "GAP_GENERAL_DISCOVERY_PROC",
            NAME_DISCOVERY => "GAP_NAME_DISCOVERY_PROC",
            AUTO_CONNECTION_ESTABLISHMENT => "GAP_AUTO_CONNECTION_ESTABLISHMENT_PROC",
            GENERAL_CONNECTION_ESTABLISHMENT => "GAP_GENERAL_CONNECTION_ESTABLISHMENT_PROC",
            SELECTIVE_CONNECTION_ESTABLISHMENT => "GAP_SELECTIVE_CONNECTION_ESTABLISHMENT_PROC",
            DIRECT_CONNECTION_ESTABLISHMENT => "GAP_DIRECT_CONNECTION_ESTABLISHMENT_PROC",
            OBSERVATION => "GAP_OBSERVATION_PROC",
            _ => return None,
        })
    }
}

/// Command status codes returned by the controller
pub mod status {
    pub const SUCCESS: u8 = 0x00;
    pub const UNKNOWN_HCI_COMMAND: u8 = 0x01;
    pub const UNKNOWN_CONN_IDENTIFIER: u8 = 0x02;
    pub const AUTH_FAILURE: u8 = 0x05;
    pub const MEM_CAPACITY_EXCEEDED: u8 = 0x07;
    pub const CONNECTION_TIMEOUT: u8 = 0x08;
    pub const COMMAND_DISALLOWED: u8 = 0x0C;
    pub const INVALID_HCI_CMD_PARAMS: u8 = 0x12;
    pub const RMT_USR_TERM_CONN: u8 = 0x13;
    pub const LOCAL_HOST_TERM_CONN: u8 = 0x16;
    pub const UNSPECIFIED_ERROR: u8 = 0x1F;
    pub const CONTROLLER_BUSY: u8 = 0x3A;
    pub const CONN_FAILED_TO_ESTABLISH: u8 = 0x3E;
    pub const FAILED: u8 = 0x41;
    pub const INVALID_PARAMS: u8 = 0x42;
    pub const NOT_ALLOWED: u8 = 0x46;
    pub const ERROR: u8 = 0x47;
    pub const INVALID_HANDLE: u8 = 0x60;
    pub const INSUFFICIENT_RESOURCES: u8 = 0x64;
    pub const TIMEOUT: u8 = 0xFF;

    pub fn name(code: u8) -> Option<&'static str> {
        Some(match code {
            SUCCESS => "BLE_STATUS_SUCCESS",
            UNKNOWN_HCI_COMMAND => "ERR_UNKNOWN_HCI_COMMAND",
            UNKNOWN_CONN_IDENTIFIER => "ERR_UNKNOWN_CONN_IDENTIFIER",
            AUTH_FAILURE => "ERR_AUTH_FAILURE",
            MEM_CAPACITY_EXCEEDED => "ERR_MEM_CAPACITY_EXCEEDED",
            CONNECTION_TIMEOUT => "ERR_CONNECTION_TIMEOUT",
            COMMAND_DISALLOWED => "ERR_COMMAND_DISALLOWED",
            INVALID_HCI_CMD_PARAMS => "ERR_INVALID_HCI_CMD_PARAMS",
            RMT_USR_TERM_CONN => "ERR_RMT_USR_TERM_CONN",
            LOCAL_HOST_TERM_CONN => "ERR_LOCAL_HOST_TERM_CONN",
            UNSPECIFIED_ERROR => "ERR_UNSPECIFIED_ERROR",
            CONTROLLER_BUSY => "ERR_CONTROLLER_BUSY",
            CONN_FAILED_TO_ESTABLISH => "ERR_CONN_FAILED_TO_ESTABLISH",
            FAILED => "BLE_STATUS_FAILED",
            INVALID_PARAMS => "BLE_STATUS_INVALID_PARAMS",
            NOT_ALLOWED => "BLE_STATUS_NOT_ALLOWED",
            ERROR => "BLE_STATUS_ERROR",
            INVALID_HANDLE => "BLE_STATUS_INVALID_HANDLE",
            INSUFFICIENT_RESOURCES => "BLE_STATUS_INSUFFICIENT_RESOURCES",
            TIMEOUT => "BLE_STATUS_TIMEOUT",
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_group_split() {
        assert_eq!(vendor::group(vendor::GAP_PROCEDURE_COMPLETE), 1);
        assert_eq!(vendor::id(vendor::GAP_PROCEDURE_COMPLETE), 7);
        assert_eq!(vendor::group_name(vendor::L2CAP_CONN_UPD_REQ), "L2CAP");
        assert_eq!(vendor::group_name(vendor::ATT_READ_BY_GROUP_TYPE_RESP), "GATT");
        assert_eq!(vendor::group_name(vendor::HAL_INITIALIZED), "HAL");
    }

    #[test]
    fn test_names() {
        assert_eq!(evt::name(evt::LE_META_EVENT), Some("EVT_LE_META_EVENT"));
        assert_eq!(evt::name(0x77), None);
        assert_eq!(le::name(le::CONN_COMPLETE), Some("EVT_LE_CONN_COMPLETE"));
        assert_eq!(procedure::name(procedure::OBSERVATION), Some("GAP_OBSERVATION_PROC"));
        assert_eq!(status::name(status::TIMEOUT), Some("BLE_STATUS_TIMEOUT"));
    }

    #[test]
    fn test_reset_fault_classification() {
        assert!(!reset::is_fault(reset::NORMAL));
        assert!(!reset::is_fault(reset::UPDATER_PIN));
        assert!(reset::is_fault(reset::WATCHDOG));
        assert!(reset::describe(0x42).is_none());
    }
}
