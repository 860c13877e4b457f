//! Static item tables for every group.

use super::{CapabilityTag, GroupId, ItemSpec};

/// Item name constants, one module per group.
pub mod items {
    pub mod radio {
        pub const RTS_THRESHOLD: &str = "rts_threshold";
        pub const FRAG_THRESHOLD: &str = "frag_threshold";
        pub const BAND_CAPABILITY: &str = "band_capability";
        pub const TX_CHAIN_MASK: &str = "tx_chain_mask";
        pub const RX_CHAIN_MASK: &str = "rx_chain_mask";
        pub const TX_CHAINMASK_CCK: &str = "tx_chainmask_cck";
        pub const TX_CHAINMASK_1SS: &str = "tx_chainmask_1ss";
        pub const NUM_11B_TX_CHAINS: &str = "num_11b_tx_chains";
        pub const NUM_11AG_TX_CHAINS: &str = "num_11ag_tx_chains";
        pub const PREVENT_LINK_DOWN: &str = "prevent_link_down";
        pub const SELECT_5GHZ_MARGIN: &str = "select_5ghz_margin";
        pub const RTT_MAC_RANDOMIZATION: &str = "rtt_mac_randomization";
        pub const CRASH_INJECT: &str = "crash_inject";
        pub const LPASS_SUPPORT: &str = "lpass_support";
        pub const SELF_RECOVERY: &str = "self_recovery";
        pub const SUB_20_CHAN_WIDTH: &str = "sub_20_chan_width";
        pub const FW_TIMEOUT_CRASH: &str = "fw_timeout_crash";
        pub const ITO_REPEAT_COUNT: &str = "ito_repeat_count";
        pub const ACS_WITH_MORE_PARAM: &str = "acs_with_more_param";
        pub const AUTO_CHANNEL_WEIGHT: &str = "auto_channel_weight";
        pub const VENDOR_ACS_SUPPORT: &str = "vendor_acs_support";
        pub const IGNORE_PEER_HT_MODE: &str = "ignore_peer_ht_mode";
        pub const BCAST_PROBE_RSP: &str = "enable_bcast_probe_rsp";
        pub const WMM_MODE: &str = "wmm_mode";
        pub const UAPSD_MASK: &str = "uapsd_mask";
        pub const FILS_ENABLED: &str = "fils_enabled";
        pub const OCE_STA_ENABLED: &str = "oce_sta_enabled";
    }

    pub mod ht {
        pub const ADV_CODING_CAP: &str = "adv_coding_cap";
        pub const CHAN_WIDTH_40: &str = "supported_channel_width_set";
        pub const MIMO_POWER_SAVE: &str = "mimo_power_save";
        pub const GREENFIELD: &str = "greenfield";
        pub const SHORT_GI_20: &str = "short_gi_20mhz";
        pub const SHORT_GI_40: &str = "short_gi_40mhz";
        pub const TX_STBC: &str = "tx_stbc";
        pub const RX_STBC: &str = "rx_stbc";
        pub const DELAYED_BA: &str = "delayed_ba";
        pub const MAX_AMSDU_LEN: &str = "maximal_amsdu_size";
        pub const DSSS_CCK_40: &str = "dsss_cck_mode_40mhz";
        pub const PSMP: &str = "psmp";
        pub const FORTY_MHZ_INTOLERANT: &str = "forty_mhz_intolerant";
        pub const LSIG_TXOP_PROTECTION: &str = "lsig_txop_protection";
        pub const MAX_AMSDU_NUM: &str = "max_amsdu_num";
        pub const MPDU_DENSITY: &str = "mpdu_density";
        pub const RX_MCS_BITMAP: &str = "rx_mcs_bitmap";
    }

    pub mod vht {
        pub const MAX_MPDU_LEN: &str = "max_mpdu_len";
        pub const CHAN_WIDTH: &str = "chan_width";
        pub const LDPC_CODING_CAP: &str = "ldpc_coding_cap";
        pub const SHORT_GI_80: &str = "short_gi_80mhz";
        pub const SHORT_GI_160: &str = "short_gi_160mhz";
        pub const TX_STBC: &str = "tx_stbc";
        pub const RX_STBC: &str = "rx_stbc";
        pub const SU_BEAMFORMER: &str = "su_beamformer";
        pub const SU_BEAMFORMEE: &str = "su_beamformee";
        pub const TX_BFEE_ANT_SUPP: &str = "tx_bfee_ant_supp";
        pub const NUM_SOUNDING_DIM: &str = "num_sounding_dim";
        pub const MU_BEAMFORMER: &str = "mu_beamformer";
        pub const MU_BEAMFORMEE: &str = "mu_beamformee";
        pub const TXOP_PS: &str = "txop_ps";
        pub const AMPDU_LEN_EXP: &str = "ampdu_len_exp";
        pub const RX_MCS_MAP: &str = "rx_mcs_map";
        pub const TX_MCS_MAP: &str = "tx_mcs_map";
        pub const RX_SUPP_DATA_RATE: &str = "rx_supp_data_rate";
        pub const TX_SUPP_DATA_RATE: &str = "tx_supp_data_rate";
        pub const BASIC_MCS_SET: &str = "basic_mcs_set";
        pub const ENABLE_TX_BF: &str = "enable_tx_bf";
        pub const RX_MCS_8_9: &str = "rx_mcs_8_9";
        pub const TX_MCS_8_9: &str = "tx_mcs_8_9";
        pub const RX_MCS_2X2: &str = "rx_mcs_2x2";
        pub const TX_MCS_2X2: &str = "tx_mcs_2x2";
        pub const VHT20_MCS9: &str = "vht20_mcs9";
        pub const ENABLE_2X2: &str = "enable2x2";
        pub const ENABLE_PAID: &str = "enable_paid";
        pub const ENABLE_GID: &str = "enable_gid";
        pub const FOR_24GHZ: &str = "vht_for_24ghz";
        pub const VENDOR_FOR_24GHZ: &str = "vendor_vht_for_24ghz";
    }

    pub mod he {
        pub const LDPC_CODING_CAP: &str = "ldpc_coding_cap";
        pub const CHAN_WIDTH_160: &str = "chan_width_160";
        pub const SU_BEAMFORMER: &str = "su_beamformer";
        pub const SU_BEAMFORMEE: &str = "su_beamformee";
        pub const MU_BEAMFORMER: &str = "mu_beamformer";
        pub const BFEE_STS_LT_80: &str = "bfee_sts_lt_80";
        pub const UL_MUMIMO: &str = "ul_mumimo";
        pub const ENABLE_UL_MIMO: &str = "enable_ul_mimo";
        pub const ENABLE_UL_OFDM: &str = "enable_ul_ofdm";
        pub const RX_MCS_MAP_LT_80: &str = "rx_mcs_map_lt_80";
        pub const TX_MCS_MAP_LT_80: &str = "tx_mcs_map_lt_80";
        pub const RX_MCS_MAP_160: &str = "rx_mcs_map_160";
        pub const TX_MCS_MAP_160: &str = "tx_mcs_map_160";
    }

    /// Shared by the four WMM access category groups.
    pub mod wmm {
        pub const DIR: &str = "dir";
        pub const NOM_MSDU_SIZE: &str = "nom_msdu_size";
        pub const MEAN_DATA_RATE: &str = "mean_data_rate";
        pub const MIN_PHY_RATE: &str = "min_phy_rate";
        pub const SBA: &str = "sba";
        pub const UAPSD_SRV_INTV: &str = "uapsd_srv_intv";
        pub const UAPSD_SUS_INTV: &str = "uapsd_sus_intv";
        pub const AIFSN: &str = "aifsn";
        pub const CWMIN: &str = "cwmin";
        pub const CWMAX: &str = "cwmax";
        pub const TXOP_LIMIT: &str = "txop_limit";
    }

    pub mod sap {
        pub const LISTEN_INTERVAL: &str = "listen_interval";
        pub const ASSOC_STA_LIMIT: &str = "assoc_sta_limit";
        pub const RMC_ACTION_PERIOD_FREQ: &str = "rmc_action_period_freq";
        pub const GET_PEER_INFO: &str = "get_peer_info";
        pub const ALLOW_ALL_CHANNELS: &str = "allow_all_channels";
        pub const MAX_PEERS: &str = "max_peers";
        pub const MAX_OFFLOAD_PEERS: &str = "max_offload_peers";
        pub const MAX_OFFLOAD_REORDER_BUFFS: &str = "max_offload_reorder_buffs";
        pub const CHN_SWITCH_BCN_COUNT: &str = "chn_switch_bcn_count";
        pub const CHN_SWITCH_MODE: &str = "chn_switch_mode";
        pub const INTERNAL_RESTART: &str = "internal_restart";
        pub const MAX_MODULATED_DTIM: &str = "max_modulated_dtim";
        pub const CHAN_PREF_LOCATION: &str = "chan_pref_location";
        pub const COUNTRY_PRIORITY: &str = "country_priority";
        pub const REDUCED_BEACON_INTERVAL: &str = "reduced_beacon_interval";
        pub const CHAN_SWITCH_RATE_ENABLED: &str = "chan_switch_rate_enabled";
        pub const INACTIVITY_OVERRIDE: &str = "inactivity_override";
        pub const MAX_INACTIVITY: &str = "max_inactivity";
        pub const OCE_SAP_ENABLED: &str = "oce_sap_enabled";
    }

    pub mod identity {
        pub const MANUFACTURER_NAME: &str = "manufacturer_name";
        pub const MODEL_NUMBER: &str = "model_number";
        pub const MODEL_NAME: &str = "model_name";
        pub const PRODUCT_NAME: &str = "manufacture_product_name";
        pub const PRODUCT_VERSION: &str = "manufacture_product_version";
    }

    pub mod wep {
        pub const DEFAULT_KEY_ID: &str = "default_key_id";
        pub const KEY_1: &str = "key_1";
        pub const KEY_2: &str = "key_2";
        pub const KEY_3: &str = "key_3";
        pub const KEY_4: &str = "key_4";
    }
}

use items::*;

/// WEP-104 key length.
pub const WEP_KEY_MAX_LEN: usize = 13;

static RADIO: &[ItemSpec] = &[
    ItemSpec::int(radio::RTS_THRESHOLD, 0, 65536, 2347),
    ItemSpec::int(radio::FRAG_THRESHOLD, 256, 8000, 8000),
    // bit 0: 2.4 GHz, bit 1: 5 GHz, bit 2: 6 GHz
    ItemSpec::int(radio::BAND_CAPABILITY, 1, 7, 3),
    ItemSpec::int(radio::TX_CHAIN_MASK, 1, 255, 3),
    ItemSpec::int(radio::RX_CHAIN_MASK, 1, 255, 3),
    ItemSpec::flag(radio::TX_CHAINMASK_CCK, false),
    ItemSpec::int(radio::TX_CHAINMASK_1SS, 0, 3, 1),
    ItemSpec::int(radio::NUM_11B_TX_CHAINS, 0, 2, 0),
    ItemSpec::int(radio::NUM_11AG_TX_CHAINS, 0, 2, 0),
    ItemSpec::flag(radio::PREVENT_LINK_DOWN, false),
    ItemSpec::int(radio::SELECT_5GHZ_MARGIN, 0, 60, 0),
    ItemSpec::flag(radio::RTT_MAC_RANDOMIZATION, false),
    ItemSpec::flag(radio::CRASH_INJECT, false),
    ItemSpec::flag(radio::LPASS_SUPPORT, false),
    ItemSpec::flag(radio::SELF_RECOVERY, false),
    ItemSpec::int(radio::SUB_20_CHAN_WIDTH, 0, 2, 0),
    ItemSpec::flag(radio::FW_TIMEOUT_CRASH, true),
    ItemSpec::int(radio::ITO_REPEAT_COUNT, 0, 5, 1),
    ItemSpec::flag(radio::ACS_WITH_MORE_PARAM, false),
    ItemSpec::int(radio::AUTO_CHANNEL_WEIGHT, 0, u32::MAX, 0x00fa_fafa),
    ItemSpec::flag(radio::VENDOR_ACS_SUPPORT, false),
    ItemSpec::flag(radio::IGNORE_PEER_HT_MODE, false),
    ItemSpec::flag(radio::BCAST_PROBE_RSP, false),
    ItemSpec::int(radio::WMM_MODE, 0, 2, 0),
    ItemSpec::int(radio::UAPSD_MASK, 0, 15, 0),
    ItemSpec::flag(radio::FILS_ENABLED, false).tagged(CapabilityTag::Fils),
    ItemSpec::flag(radio::OCE_STA_ENABLED, false).tagged(CapabilityTag::Oce),
];

static HT: &[ItemSpec] = &[
    ItemSpec::flag(ht::ADV_CODING_CAP, true),
    ItemSpec::flag(ht::CHAN_WIDTH_40, true),
    ItemSpec::int(ht::MIMO_POWER_SAVE, 0, 3, 3),
    ItemSpec::flag(ht::GREENFIELD, false),
    ItemSpec::flag(ht::SHORT_GI_20, true),
    ItemSpec::flag(ht::SHORT_GI_40, true),
    ItemSpec::flag(ht::TX_STBC, true),
    ItemSpec::int(ht::RX_STBC, 0, 3, 1),
    ItemSpec::flag(ht::DELAYED_BA, false),
    ItemSpec::flag(ht::MAX_AMSDU_LEN, false),
    ItemSpec::flag(ht::DSSS_CCK_40, true),
    ItemSpec::flag(ht::PSMP, false),
    ItemSpec::flag(ht::FORTY_MHZ_INTOLERANT, false),
    ItemSpec::flag(ht::LSIG_TXOP_PROTECTION, false),
    ItemSpec::int(ht::MAX_AMSDU_NUM, 0, 15, 0),
    ItemSpec::int(ht::MPDU_DENSITY, 0, 7, 0),
    // Supported MCS set bitmask: bytes 0..4 are MCS 0-31 by stream, bytes
    // 4..10 are MCS 32-76.
    ItemSpec::bytes(ht::RX_MCS_BITMAP, 10, &[0xff, 0xff]),
];

static VHT: &[ItemSpec] = &[
    ItemSpec::int(vht::MAX_MPDU_LEN, 0, 2, 0),
    ItemSpec::int(vht::CHAN_WIDTH, 0, 4, 2),
    ItemSpec::flag(vht::LDPC_CODING_CAP, true),
    ItemSpec::flag(vht::SHORT_GI_80, true),
    ItemSpec::flag(vht::SHORT_GI_160, false),
    ItemSpec::flag(vht::TX_STBC, true),
    ItemSpec::int(vht::RX_STBC, 0, 4, 1),
    ItemSpec::flag(vht::SU_BEAMFORMER, false),
    ItemSpec::flag(vht::SU_BEAMFORMEE, true),
    ItemSpec::int(vht::TX_BFEE_ANT_SUPP, 0, 7, 2),
    ItemSpec::int(vht::NUM_SOUNDING_DIM, 0, 7, 1),
    ItemSpec::flag(vht::MU_BEAMFORMER, false),
    ItemSpec::flag(vht::MU_BEAMFORMEE, false),
    ItemSpec::flag(vht::TXOP_PS, false),
    ItemSpec::int(vht::AMPDU_LEN_EXP, 0, 7, 7),
    ItemSpec::int(vht::RX_MCS_MAP, 0, 0xffff, 0xfffa),
    ItemSpec::int(vht::TX_MCS_MAP, 0, 0xffff, 0xfffa),
    ItemSpec::int(vht::RX_SUPP_DATA_RATE, 0, 0x1fff, 780),
    ItemSpec::int(vht::TX_SUPP_DATA_RATE, 0, 0x1fff, 780),
    ItemSpec::int(vht::BASIC_MCS_SET, 0, 0xffff, 0xfffe),
    ItemSpec::flag(vht::ENABLE_TX_BF, false),
    ItemSpec::int(vht::RX_MCS_8_9, 0, 3, 2),
    ItemSpec::int(vht::TX_MCS_8_9, 0, 3, 2),
    ItemSpec::int(vht::RX_MCS_2X2, 0, 3, 2),
    ItemSpec::int(vht::TX_MCS_2X2, 0, 3, 2),
    ItemSpec::flag(vht::VHT20_MCS9, true),
    ItemSpec::flag(vht::ENABLE_2X2, true),
    ItemSpec::flag(vht::ENABLE_PAID, false),
    ItemSpec::flag(vht::ENABLE_GID, false),
    ItemSpec::flag(vht::FOR_24GHZ, false),
    ItemSpec::flag(vht::VENDOR_FOR_24GHZ, false),
];

static HE: &[ItemSpec] = &[
    ItemSpec::flag(he::LDPC_CODING_CAP, true).tagged(CapabilityTag::Dot11ax),
    ItemSpec::flag(he::CHAN_WIDTH_160, false).tagged(CapabilityTag::Dot11ax),
    ItemSpec::flag(he::SU_BEAMFORMER, false).tagged(CapabilityTag::Dot11ax),
    ItemSpec::flag(he::SU_BEAMFORMEE, true).tagged(CapabilityTag::Dot11ax),
    ItemSpec::flag(he::MU_BEAMFORMER, false).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::BFEE_STS_LT_80, 0, 7, 2).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::UL_MUMIMO, 0, 1, 1).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::ENABLE_UL_MIMO, 0, 1, 0).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::ENABLE_UL_OFDM, 0, 1, 0).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::RX_MCS_MAP_LT_80, 0, 0xffff, 0xfffa).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::TX_MCS_MAP_LT_80, 0, 0xffff, 0xfffa).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::RX_MCS_MAP_160, 0, 0xffff, 0xffff).tagged(CapabilityTag::Dot11ax),
    ItemSpec::int(he::TX_MCS_MAP_160, 0, 0xffff, 0xffff).tagged(CapabilityTag::Dot11ax),
];

macro_rules! wmm_table {
    ($name:ident, msdu = $msdu:expr, rate = $rate:expr, srv = $srv:expr,
     aifsn = $aifsn:expr, cwmin = $cwmin:expr, cwmax = $cwmax:expr, txop = $txop:expr) => {
        static $name: &[ItemSpec] = &[
            ItemSpec::int(wmm::DIR, 0, 3, 3),
            ItemSpec::int(wmm::NOM_MSDU_SIZE, 0, 0xffff, $msdu),
            ItemSpec::int(wmm::MEAN_DATA_RATE, 0, u32::MAX, $rate),
            ItemSpec::int(wmm::MIN_PHY_RATE, 0, u32::MAX, 0x005b_8d80),
            ItemSpec::int(wmm::SBA, 0x2001, 0xffff, 0x2001),
            ItemSpec::int(wmm::UAPSD_SRV_INTV, 0, u32::MAX, $srv),
            ItemSpec::int(wmm::UAPSD_SUS_INTV, 0, u32::MAX, 2000),
            ItemSpec::int(wmm::AIFSN, 1, 15, $aifsn),
            ItemSpec::int(wmm::CWMIN, 0, 15, $cwmin),
            ItemSpec::int(wmm::CWMAX, 0, 15, $cwmax),
            ItemSpec::int(wmm::TXOP_LIMIT, 0, 0xffff, $txop),
        ];
    };
}

wmm_table!(WMM_BE, msdu = 0x85dc, rate = 0x0004_93e0, srv = 0,
           aifsn = 3, cwmin = 4, cwmax = 10, txop = 0);
wmm_table!(WMM_BK, msdu = 0x85dc, rate = 0x0004_93e0, srv = 0,
           aifsn = 7, cwmin = 4, cwmax = 10, txop = 0);
wmm_table!(WMM_VI, msdu = 0x85dc, rate = 0x0005_7e40, srv = 40,
           aifsn = 2, cwmin = 3, cwmax = 4, txop = 94);
wmm_table!(WMM_VO, msdu = 0x80d0, rate = 0x0001_4500, srv = 20,
           aifsn = 2, cwmin = 2, cwmax = 3, txop = 47);

static SAP: &[ItemSpec] = &[
    ItemSpec::int(sap::LISTEN_INTERVAL, 1, 65535, 1),
    ItemSpec::int(sap::ASSOC_STA_LIMIT, 1, 32, 10),
    ItemSpec::int(sap::RMC_ACTION_PERIOD_FREQ, 100, 1000, 300),
    ItemSpec::flag(sap::GET_PEER_INFO, false),
    ItemSpec::flag(sap::ALLOW_ALL_CHANNELS, false),
    ItemSpec::int(sap::MAX_PEERS, 1, 32, 32),
    ItemSpec::int(sap::MAX_OFFLOAD_PEERS, 2, 5, 2),
    ItemSpec::int(sap::MAX_OFFLOAD_REORDER_BUFFS, 0, 3, 2),
    ItemSpec::int(sap::CHN_SWITCH_BCN_COUNT, 1, 10, 10),
    ItemSpec::flag(sap::CHN_SWITCH_MODE, true),
    ItemSpec::flag(sap::INTERNAL_RESTART, true),
    ItemSpec::int(sap::MAX_MODULATED_DTIM, 1, 10, 10),
    ItemSpec::int(sap::CHAN_PREF_LOCATION, 0, 2, 0),
    ItemSpec::flag(sap::COUNTRY_PRIORITY, false),
    ItemSpec::int(sap::REDUCED_BEACON_INTERVAL, 0, 100, 0),
    ItemSpec::flag(sap::CHAN_SWITCH_RATE_ENABLED, false),
    ItemSpec::flag(sap::INACTIVITY_OVERRIDE, false),
    ItemSpec::int(sap::MAX_INACTIVITY, 0, 65535, 300),
    ItemSpec::flag(sap::OCE_SAP_ENABLED, false).tagged(CapabilityTag::Oce),
];

static IDENTITY: &[ItemSpec] = &[
    ItemSpec::bytes(identity::MANUFACTURER_NAME, 64, b"Generic"),
    ItemSpec::bytes(identity::MODEL_NUMBER, 32, b"WLAN-0001"),
    ItemSpec::bytes(identity::MODEL_NAME, 32, b"WLAN"),
    ItemSpec::bytes(identity::PRODUCT_NAME, 32, b"WLAN Device"),
    ItemSpec::bytes(identity::PRODUCT_VERSION, 32, b"1.0"),
];

static WEP: &[ItemSpec] = &[
    ItemSpec::int(wep::DEFAULT_KEY_ID, 0, 3, 0),
    ItemSpec::bytes(wep::KEY_1, WEP_KEY_MAX_LEN, b"").secret(),
    ItemSpec::bytes(wep::KEY_2, WEP_KEY_MAX_LEN, b"").secret(),
    ItemSpec::bytes(wep::KEY_3, WEP_KEY_MAX_LEN, b"").secret(),
    ItemSpec::bytes(wep::KEY_4, WEP_KEY_MAX_LEN, b"").secret(),
];

pub(super) fn group_items(group: GroupId) -> &'static [ItemSpec] {
    match group {
        GroupId::Radio => RADIO,
        GroupId::Ht => HT,
        GroupId::Vht => VHT,
        GroupId::He => HE,
        GroupId::WmmBe => WMM_BE,
        GroupId::WmmBk => WMM_BK,
        GroupId::WmmVi => WMM_VI,
        GroupId::WmmVo => WMM_VO,
        GroupId::Sap => SAP,
        GroupId::Identity => IDENTITY,
        GroupId::Wep => WEP,
    }
}
